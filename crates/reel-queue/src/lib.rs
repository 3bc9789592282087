//! Client for the movie generation queue API.
//!
//! Submissions are one-shot: a request is validated, posted once and the
//! outcome collapsed to a single display string on failure.

pub mod client;
pub mod error;
pub mod types;

pub use client::{QueueClient, QueueClientConfig};
pub use error::{QueueError, QueueResult, SUBMIT_FAILED};
pub use types::SubmitResponse;
