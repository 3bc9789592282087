//! Queue API HTTP client.

use std::time::Duration;

use metrics::counter;
use reqwest::Client;
use tracing::{debug, info, warn};
use validator::Validate;

use reel_models::MovieRequest;

use crate::error::{QueueError, QueueResult};
use crate::types::SubmitResponse;

const DEFAULT_QUEUE_URL: &str = "http://localhost:3006";

/// Submission counter, labelled by outcome.
pub const SUBMISSIONS_TOTAL: &str = "queue_submissions_total";

/// Configuration for the queue client.
#[derive(Debug, Clone)]
pub struct QueueClientConfig {
    /// Base URL of the queue service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for QueueClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_QUEUE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl QueueClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("QUEUE_API_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_QUEUE_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("QUEUE_API_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

/// Client for the job enqueue endpoint.
#[derive(Clone)]
pub struct QueueClient {
    http: Client,
    config: QueueClientConfig,
}

impl QueueClient {
    pub fn new(config: QueueClientConfig) -> QueueResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(QueueError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> QueueResult<Self> {
        Self::new(QueueClientConfig::from_env())
    }

    /// Enqueue a movie generation job. Sent once, never retried.
    pub async fn submit(&self, request: &MovieRequest) -> QueueResult<SubmitResponse> {
        let result = self.submit_inner(request).await;

        let outcome = match &result {
            Ok(_) => "accepted",
            Err(e) => e.outcome(),
        };
        counter!(SUBMISSIONS_TOTAL, "outcome" => outcome).increment(1);

        match &result {
            Ok(_) => info!(user_id = %request.user_id, genre = %request.genre, "Movie submitted to queue"),
            Err(e) => warn!(user_id = %request.user_id, "Queue submission failed: {}", e),
        }

        result
    }

    async fn submit_inner(&self, request: &MovieRequest) -> QueueResult<SubmitResponse> {
        request.validate()?;

        let url = format!("{}/api/movies", self.config.base_url.trim_end_matches('/'));
        debug!("Submitting to queue: {}", url);

        let response = self.http.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!("Queue returned {}: {}", status, body);
            return Err(QueueError::Http(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: SubmitResponse = serde_json::from_str(&body)?;

        if parsed.success {
            Ok(parsed)
        } else {
            Err(QueueError::Rejected(parsed.error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::error::SUBMIT_FAILED;

    fn client(server: &MockServer) -> QueueClient {
        QueueClient::new(QueueClientConfig {
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap()
    }

    fn request() -> MovieRequest {
        MovieRequest::new("u1", "A detective in the rain", "noir")
    }

    #[test]
    fn test_config_defaults() {
        let config = QueueClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3006");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var("QUEUE_API_URL", "https://queue.example.com");
        std::env::set_var("QUEUE_API_TIMEOUT_SECS", "7");
        let config = QueueClientConfig::from_env();
        assert_eq!(config.base_url, "https://queue.example.com");
        assert_eq!(config.timeout, Duration::from_secs(7));

        std::env::remove_var("QUEUE_API_URL");
        std::env::remove_var("QUEUE_API_TIMEOUT_SECS");
        assert_eq!(QueueClientConfig::from_env().base_url, "http://localhost:3006");
    }

    #[tokio::test]
    async fn test_submit_success_posts_full_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/movies"))
            .and(body_partial_json(json!({
                "prompt": "A detective in the rain",
                "genre": "noir",
                "num_sequences": 50,
                "seed": 391688,
                "sampler": "euler",
                "steps": 20,
                "cfg_scale": 7.5,
                "userId": "u1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client(&server).submit(&request()).await.unwrap();
        assert!(resp.success);
    }

    #[tokio::test]
    async fn test_submit_non_2xx_uses_fallback_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).submit(&request()).await.unwrap_err();
        assert!(matches!(err, QueueError::Http(500)));
        assert_eq!(err.user_message(), SUBMIT_FAILED);
    }

    #[tokio::test]
    async fn test_submit_rejected_surfaces_queue_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": false, "error": "Queue is full"})),
            )
            .mount(&server)
            .await;

        let err = client(&server).submit(&request()).await.unwrap_err();
        assert_eq!(err.user_message(), "Queue is full");
    }

    #[tokio::test]
    async fn test_submit_rejected_without_error_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .mount(&server)
            .await;

        let err = client(&server).submit(&request()).await.unwrap_err();
        assert_eq!(err.user_message(), SUBMIT_FAILED);
    }

    #[tokio::test]
    async fn test_invalid_request_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut bad = request();
        bad.prompt.clear();
        bad.steps = 0;

        let err = client(&server).submit(&bad).await.unwrap_err();
        assert!(matches!(err, QueueError::Validation(_)));
        assert_eq!(err.user_message(), "Please check: prompt, steps");
    }
}
