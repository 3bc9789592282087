//! Generation pipeline stages and their per-stage progress.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One of the three fixed generation phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Story,
    Images,
    Video,
}

impl Stage {
    /// Declared stage order. Scans always walk stages in this order.
    pub const ALL: [Stage; 3] = [Stage::Story, Stage::Images, Stage::Video];

    /// Key used in the `progress` map of a job document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Story => "story",
            Stage::Images => "images",
            Stage::Video => "video",
        }
    }

    /// Label shown under the stage bar.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Story => "Story",
            Stage::Images => "Base Visuals",
            Stage::Video => "Video/Audio",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "story" => Some(Stage::Story),
            "images" => Some(Stage::Images),
            "video" => Some(Stage::Video),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Progress of a single stage as reported by the generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    Pending,
    Processing,
    Completed,
}

impl StageState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageState::Pending => "pending",
            StageState::Processing => "processing",
            StageState::Completed => "completed",
        }
    }

    /// Parse a backend value. Unrecognized values yield `None` and are
    /// treated as "not yet started" by the projection.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(StageState::Pending),
            "processing" => Some(StageState::Processing),
            "completed" => Some(StageState::Completed),
            _ => None,
        }
    }
}

/// Per-stage progress map of a job.
///
/// Each stage is mutated independently by the backend, so any combination
/// is possible (e.g. `video` completed while `story` is still pending).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProgress {
    #[serde(default, deserialize_with = "lenient_state", skip_serializing_if = "Option::is_none")]
    pub story: Option<StageState>,
    #[serde(default, deserialize_with = "lenient_state", skip_serializing_if = "Option::is_none")]
    pub images: Option<StageState>,
    #[serde(default, deserialize_with = "lenient_state", skip_serializing_if = "Option::is_none")]
    pub video: Option<StageState>,
}

impl StageProgress {
    pub fn get(&self, stage: Stage) -> Option<StageState> {
        match stage {
            Stage::Story => self.story,
            Stage::Images => self.images,
            Stage::Video => self.video,
        }
    }

    pub fn set(&mut self, stage: Stage, state: Option<StageState>) {
        match stage {
            Stage::Story => self.story = state,
            Stage::Images => self.images = state,
            Stage::Video => self.video = state,
        }
    }

    /// Builder-style variant of [`StageProgress::set`].
    pub fn with(mut self, stage: Stage, state: StageState) -> Self {
        self.set(stage, Some(state));
        self
    }

    pub fn is_completed(&self, stage: Stage) -> bool {
        self.get(stage) == Some(StageState::Completed)
    }
}

fn lenient_state<'de, D>(deserializer: D) -> Result<Option<StageState>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(StageState::parse))
}
