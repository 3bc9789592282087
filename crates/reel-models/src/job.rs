//! Movie generation job documents.
//!
//! A job is owned by the external document store; this client reads it and
//! only ever writes the publication flag. Every field the backend may omit is
//! an explicit `Option` (or has a documented default) so call sites never
//! probe for presence themselves.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::stage::StageProgress;

/// Opaque job identifier assigned by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Top-level lifecycle status, mutated by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Parse a backend value; anything unrecognized is treated as absent.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "queued" => Some(JobStatus::Queued),
            "processing" => Some(JobStatus::Processing),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    /// Queued or processing: the job still occupies the generation backend.
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Processing)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Story metadata written by the story stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

/// A movie generation job as stored in the `movies` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,

    /// Owner (`userId` in the document)
    #[serde(rename = "userId", default)]
    pub owner: String,

    /// Lifecycle status, absent until the backend picks the job up
    #[serde(default, deserialize_with = "lenient_status", skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,

    /// Per-stage progress map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<StageProgress>,

    #[serde(default)]
    pub is_published: bool,

    #[serde(default)]
    pub featured: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Genre requested at submission time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    /// Story metadata (`story.movie_info`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_info: Option<MovieInfo>,

    /// Generated still images (`images.image_urls`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,

    /// Final video (`final_video`, falling back to `video.video_url`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl Job {
    /// Create an empty job record: no status, no progress, unpublished.
    pub fn new(id: impl Into<JobId>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            status: None,
            progress: None,
            is_published: false,
            featured: false,
            created_at: None,
            genre: None,
            movie_info: None,
            image_urls: Vec::new(),
            video_url: None,
        }
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_progress(mut self, progress: StageProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.movie_info.as_ref().and_then(|m| non_empty(m.title.as_deref()))
    }

    pub fn description(&self) -> Option<&str> {
        self.movie_info.as_ref().and_then(|m| non_empty(m.description.as_deref()))
    }

    /// Genre for display: the story's genre wins over the requested one.
    pub fn display_genre(&self) -> Option<&str> {
        self.movie_info
            .as_ref()
            .and_then(|m| non_empty(m.genre.as_deref()))
            .or_else(|| non_empty(self.genre.as_deref()))
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn lenient_status<'de, D>(deserializer: D) -> Result<Option<JobStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(JobStatus::parse))
}
