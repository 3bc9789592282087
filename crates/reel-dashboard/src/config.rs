//! Dashboard configuration.

use std::time::Duration;

use crate::error::{DashboardError, DashboardResult};

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Signed-in user whose jobs are shown
    pub user_id: String,
    /// How often live queries re-read the job collection
    pub poll_interval: Duration,
}

impl DashboardConfig {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            poll_interval: Duration::from_secs(5),
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> DashboardResult<Self> {
        let user_id = std::env::var("REEL_USER_ID")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DashboardError::config_error("REEL_USER_ID must be set"))?;

        let poll_secs: u64 = std::env::var("DASHBOARD_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|s| *s > 0)
            .unwrap_or(5);

        Ok(Self {
            user_id,
            poll_interval: Duration::from_secs(poll_secs),
        })
    }
}
