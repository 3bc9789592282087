//! Queue client error types.

use thiserror::Error;

pub type QueueResult<T> = Result<T, QueueError>;

/// Fallback message shown when the queue gives no better explanation.
pub const SUBMIT_FAILED: &str = "Failed to submit movie to queue";

#[derive(Debug, Error)]
pub enum QueueError {
    /// Queue answered 2xx but refused the job.
    #[error("Queue rejected submission: {}", .0.as_deref().unwrap_or(SUBMIT_FAILED))]
    Rejected(Option<String>),

    #[error("Queue returned HTTP {0}")]
    Http(u16),

    #[error("Invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueueError {
    /// The single string shown inline on the submission form.
    pub fn user_message(&self) -> String {
        match self {
            QueueError::Rejected(Some(msg)) if !msg.is_empty() => msg.clone(),
            QueueError::Validation(errors) => {
                let mut fields: Vec<String> = errors
                    .field_errors()
                    .keys()
                    .map(|k| k.to_string())
                    .collect();
                fields.sort_unstable();
                format!("Please check: {}", fields.join(", "))
            }
            _ => SUBMIT_FAILED.to_string(),
        }
    }

    /// Label used for the submission outcome metric.
    pub fn outcome(&self) -> &'static str {
        match self {
            QueueError::Rejected(_) => "rejected",
            QueueError::Http(_) => "http_error",
            QueueError::Validation(_) => "invalid",
            QueueError::Network(_) => "network",
            QueueError::Json(_) => "bad_response",
        }
    }
}
