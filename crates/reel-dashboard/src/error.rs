//! Dashboard error types.

use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Alert shown when a delete fails.
pub const DELETE_FAILED: &str = "Failed to delete movie. Please try again.";

/// Alert shown when a publish toggle fails.
pub const PUBLISH_FAILED: &str = "Failed to update movie. Please try again.";

/// Shown when a read (job list, catalog) fails.
pub const LOAD_FAILED: &str = "Failed to load movies. Please try again.";

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A write to a movie document failed
    #[error("Update failed: {0}")]
    UpdateFailed(#[source] reel_firestore::FirestoreError),

    #[error("Firestore error: {0}")]
    Firestore(#[from] reel_firestore::FirestoreError),

    #[error("Queue error: {0}")]
    Queue(#[from] reel_queue::QueueError),
}

impl DashboardError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// One display string for the UI boundary.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Queue(e) => e.user_message(),
            DashboardError::UpdateFailed(_) => PUBLISH_FAILED.to_string(),
            DashboardError::Firestore(_) => LOAD_FAILED.to_string(),
            DashboardError::ConfigError(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_firestore::FirestoreError;

    #[test]
    fn test_user_message_depends_on_operation() {
        let update = DashboardError::UpdateFailed(FirestoreError::from_http_status(403, "rules"));
        assert_eq!(update.user_message(), PUBLISH_FAILED);

        let read: DashboardError = FirestoreError::from_http_status(503, "unavailable").into();
        assert_eq!(read.user_message(), LOAD_FAILED);

        let queue: DashboardError = reel_queue::QueueError::Http(500).into();
        assert_eq!(queue.user_message(), reel_queue::SUBMIT_FAILED);
    }
}
