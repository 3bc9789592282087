//! Dashboard session for one signed-in user.
//!
//! Owns the live job subscription and the last snapshot it delivered. Every
//! snapshot is re-projected in full; nothing is diffed per job.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use reel_firestore::{MovieRepository, Subscription};
use reel_models::{build_cards, Job, JobCard, JobId};

use crate::error::{DashboardError, DashboardResult, DELETE_FAILED};

/// Question asked before a job is deleted.
pub const DELETE_PROMPT: &str =
    "Are you sure you want to delete this movie? This action cannot be undone.";

/// What the dashboard grid shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardState {
    /// No snapshot has arrived yet
    Loading,
    /// Cards for the latest snapshot, newest job first
    Ready(Vec<JobCard>),
}

/// Blocking yes/no confirmation supplied by the UI.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation; nothing was sent
    Cancelled,
    /// Alert text for the user
    Failed(String),
}

pub struct DashboardSession {
    repo: MovieRepository,
    user_id: String,
    poll_interval: Duration,
    subscription: Option<Subscription<Job>>,
    jobs: Option<Vec<Job>>,
}

impl DashboardSession {
    /// Start watching the jobs of `user_id`.
    pub fn open(repo: MovieRepository, user_id: impl Into<String>, poll_interval: Duration) -> Self {
        let user_id = user_id.into();
        let subscription = repo.watch_owner(&user_id, poll_interval);
        info!(user_id = %user_id, "Dashboard session opened");

        Self {
            repo,
            user_id,
            poll_interval,
            subscription: Some(subscription),
            jobs: None,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Latest snapshot, `None` while loading.
    pub fn jobs(&self) -> Option<&[Job]> {
        self.jobs.as_deref()
    }

    /// Current grid state rendered at `now`.
    pub fn state_at(&self, now: DateTime<Utc>) -> DashboardState {
        match &self.jobs {
            None => DashboardState::Loading,
            Some(jobs) => DashboardState::Ready(build_cards(jobs, now)),
        }
    }

    pub fn state(&self) -> DashboardState {
        self.state_at(Utc::now())
    }

    /// Wait for the next snapshot and return the new state.
    ///
    /// Returns `None` once the session has been closed.
    pub async fn next(&mut self) -> Option<DashboardState> {
        let jobs = self.subscription.as_mut()?.next().await?;
        self.jobs = Some(jobs);
        Some(self.state())
    }

    /// Switch to another user. The old subscription is torn down first and
    /// the session goes back to loading.
    pub async fn switch_user(&mut self, user_id: impl Into<String>) {
        if let Some(old) = self.subscription.take() {
            old.cancel().await;
        }
        self.user_id = user_id.into();
        self.jobs = None;
        self.subscription = Some(self.repo.watch_owner(&self.user_id, self.poll_interval));
        info!(user_id = %self.user_id, "Dashboard session switched user");
    }

    /// Flip the publication flag of a job.
    ///
    /// `currently_published` is the flag as displayed; the stored value is
    /// overwritten with its negation, so overlapping toggles end with the
    /// last write.
    pub async fn toggle_publish(
        &mut self,
        job_id: &JobId,
        currently_published: bool,
    ) -> DashboardResult<()> {
        let published = !currently_published;

        if let Err(e) = self.repo.set_published(job_id, published).await {
            error!(job_id = %job_id, "Error updating movie: {}", e);
            return Err(DashboardError::UpdateFailed(e));
        }

        if let Some(job) = self.find_mut(job_id) {
            job.is_published = published;
        }
        Ok(())
    }

    /// Delete a job after the user confirms.
    pub async fn delete(&mut self, job_id: &JobId, confirm: &dyn Confirm) -> DeleteOutcome {
        if !confirm.confirm(DELETE_PROMPT) {
            return DeleteOutcome::Cancelled;
        }

        match self.repo.delete(job_id).await {
            Ok(()) => {
                if let Some(jobs) = self.jobs.as_mut() {
                    jobs.retain(|j| &j.id != job_id);
                }
                DeleteOutcome::Deleted
            }
            Err(e) => {
                error!(job_id = %job_id, "Error deleting movie: {}", e);
                DeleteOutcome::Failed(DELETE_FAILED.to_string())
            }
        }
    }

    /// Stop the live subscription and wait for it to wind down.
    pub async fn close(mut self) {
        if let Some(sub) = self.subscription.take() {
            sub.cancel().await;
        }
        info!(user_id = %self.user_id, "Dashboard session closed");
    }

    fn find_mut(&mut self, job_id: &JobId) -> Option<&mut Job> {
        let found = self
            .jobs
            .as_mut()
            .and_then(|jobs| jobs.iter_mut().find(|j| &j.id == job_id));
        if found.is_none() {
            warn!(job_id = %job_id, "Job not in current snapshot");
        }
        found
    }
}
