//! Navigation badge counting the user's unfinished jobs.

use std::time::Duration;

use reel_firestore::{MovieRepository, Subscription};
use reel_models::Job;

/// Live count of queued and processing jobs.
pub struct ActiveJobsBadge {
    subscription: Subscription<Job>,
    count: usize,
}

impl ActiveJobsBadge {
    pub fn open(repo: &MovieRepository, user_id: &str, poll_interval: Duration) -> Self {
        Self {
            subscription: repo.watch_active(user_id, poll_interval),
            count: 0,
        }
    }

    /// Last known count; 0 until the first snapshot.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Text for the badge, hidden when nothing is running.
    pub fn label(&self) -> Option<String> {
        (self.count > 0).then(|| self.count.to_string())
    }

    /// Wait for the count to change.
    pub async fn next(&mut self) -> Option<usize> {
        let jobs = self.subscription.next().await?;
        self.count = count_active(&jobs);
        Some(self.count)
    }

    pub async fn close(self) {
        self.subscription.cancel().await;
    }
}

/// The query already filters on status; a job that finished between the
/// query and the read is still not counted.
fn count_active(jobs: &[Job]) -> usize {
    jobs.iter()
        .filter(|j| j.status.is_some_and(|s| s.is_active()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_models::JobStatus;

    #[test]
    fn test_count_active() {
        let jobs = vec![
            Job::new("a", "u1").with_status(JobStatus::Queued),
            Job::new("b", "u1").with_status(JobStatus::Processing),
            Job::new("c", "u1").with_status(JobStatus::Completed),
            Job::new("d", "u1"),
        ];
        assert_eq!(count_active(&jobs), 2);
        assert_eq!(count_active(&[]), 0);
    }
}
