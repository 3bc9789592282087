//! Queue API wire types.

use serde::Deserialize;

/// Body returned by `POST /api/movies`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
