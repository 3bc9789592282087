//! Movie submission form state.

use tracing::info;

use reel_models::{parse_num_sequences, MovieRequest, Sampler};
use reel_queue::QueueClient;

/// Form backing the "Create" page.
///
/// Holds the request being edited, the in-flight flag and the single inline
/// error line. A submission failure never clears the user's input.
#[derive(Debug, Clone)]
pub struct CreateForm {
    pub request: MovieRequest,
    loading: bool,
    error: Option<String>,
}

impl CreateForm {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            request: MovieRequest::new(user_id, "", ""),
            loading: false,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.request.prompt = prompt.into();
    }

    pub fn set_genre(&mut self, genre: impl Into<String>) {
        self.request.genre = genre.into();
    }

    pub fn set_sampler(&mut self, sampler: Sampler) {
        self.request.sampler = sampler;
    }

    /// Free-text sequence count; unparseable input becomes 0.
    pub fn set_num_sequences(&mut self, input: &str) {
        self.request.num_sequences = parse_num_sequences(input);
    }

    /// Submit once. Returns `true` when the queue accepted the job, at which
    /// point the caller navigates back to the dashboard.
    pub async fn submit(&mut self, queue: &QueueClient) -> bool {
        self.loading = true;
        self.error = None;

        let result = queue.submit(&self.request).await;
        self.loading = false;

        match result {
            Ok(_) => {
                info!(genre = %self.request.genre, "Movie accepted by queue");
                true
            }
            Err(e) => {
                self.error = Some(e.user_message());
                false
            }
        }
    }
}
