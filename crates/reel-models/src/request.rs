//! Movie submission request sent to the queue API.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Genres offered by the submission form.
pub const GENRES: [&str; 13] = [
    "noir",
    "sci-fi",
    "horror",
    "romance",
    "action",
    "indie",
    "post-apocalyptic",
    "western",
    "cyberpunk",
    "fantasy",
    "superhero",
    "blockbuster",
    "cinematic",
];

pub const DEFAULT_NUM_SEQUENCES: u32 = 50;
pub const DEFAULT_SEED: u64 = 391_688;
pub const DEFAULT_STEPS: u32 = 20;
pub const DEFAULT_CFG_SCALE: f64 = 7.5;

/// Diffusion sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sampler {
    #[default]
    Euler,
    EulerA,
    Dpm2,
    Dpm2A,
    Lms,
    Heun,
}

impl Sampler {
    pub const ALL: [Sampler; 6] = [
        Sampler::Euler,
        Sampler::EulerA,
        Sampler::Dpm2,
        Sampler::Dpm2A,
        Sampler::Lms,
        Sampler::Heun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sampler::Euler => "euler",
            Sampler::EulerA => "euler_a",
            Sampler::Dpm2 => "dpm2",
            Sampler::Dpm2A => "dpm2_a",
            Sampler::Lms => "lms",
            Sampler::Heun => "heun",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sampler::Euler => "Euler",
            Sampler::EulerA => "Euler Ancestral",
            Sampler::Dpm2 => "DPM2",
            Sampler::Dpm2A => "DPM2 Ancestral",
            Sampler::Lms => "LMS",
            Sampler::Heun => "Heun",
        }
    }
}

impl fmt::Display for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Body of `POST /api/movies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct MovieRequest {
    #[validate(length(min = 1, message = "prompt is required"))]
    pub prompt: String,

    #[validate(length(min = 1, message = "genre is required"))]
    pub genre: String,

    pub num_sequences: u32,

    pub seed: u64,

    #[serde(default)]
    pub sampler: Sampler,

    #[validate(range(min = 1, max = 150))]
    pub steps: u32,

    #[validate(range(min = 1.0, max = 20.0))]
    pub cfg_scale: f64,

    /// Requesting user
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl MovieRequest {
    /// Request with the form's default advanced settings.
    pub fn new(user_id: impl Into<String>, prompt: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            genre: genre.into(),
            num_sequences: DEFAULT_NUM_SEQUENCES,
            seed: DEFAULT_SEED,
            sampler: Sampler::default(),
            steps: DEFAULT_STEPS,
            cfg_scale: DEFAULT_CFG_SCALE,
            user_id: user_id.into(),
        }
    }
}

/// Parse the free-text sequence count field: leading digits are used and
/// anything unparseable becomes 0. Counts beyond `u32::MAX` saturate.
pub fn parse_num_sequences(input: &str) -> u32 {
    input
        .trim_start()
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(d))
}
