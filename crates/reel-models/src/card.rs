//! Dashboard card model: everything the "My Movies" grid paints for a job.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::job::{Job, JobId, JobStatus};
use crate::projection::{project, CoarseStatus, DerivedView};

/// Messages rotated under cards that are still generating.
pub const HYPE_MESSAGES: [&str; 5] = [
    "Popcorn ready? Your movie is coming!",
    "The AI directors are working overtime...",
    "Your blockbuster is almost here...",
    "Building your cinematic universe...",
    "Rendering neon dreams...",
];

/// Hype message rotation period in milliseconds.
pub const HYPE_ROTATION_MS: i64 = 4000;

pub const UNTITLED: &str = "Untitled Movie";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const UNKNOWN_DATE: &str = "Unknown date";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobCard {
    pub job_id: JobId,
    pub title: String,
    pub description: String,
    pub genre: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub created: String,
    pub is_published: bool,
    pub view: DerivedView,
    pub status_text: &'static str,
    /// Stage bar is hidden once the lifecycle status reads completed
    pub show_stage_bar: bool,
    /// Publish/delete controls are only offered for finished movies
    pub show_actions: bool,
    pub publish_label: &'static str,
    /// `Published` / `Unpublished` line shown beside the actions
    pub published_label: &'static str,
    pub hype_message: Option<&'static str>,
}

impl JobCard {
    /// Build the card for the job at grid position `index`.
    pub fn build(job: &Job, index: usize, now: DateTime<Utc>) -> Self {
        let view = project(job);
        let generating = job.status.is_some_and(|s| s.is_active());

        Self {
            job_id: job.id.clone(),
            title: job.title().unwrap_or(UNTITLED).to_string(),
            description: job.description().unwrap_or(NO_DESCRIPTION).to_string(),
            genre: job.display_genre().map(str::to_string),
            thumbnail_url: job.thumbnail_url().map(str::to_string),
            video_url: job.video_url.clone(),
            created: format_created_date(job.created_at),
            is_published: job.is_published,
            status_text: view.status.label(),
            show_stage_bar: job.status != Some(JobStatus::Completed),
            show_actions: view.status == CoarseStatus::Completed,
            publish_label: if job.is_published { "Unpublish" } else { "Publish" },
            published_label: if job.is_published { "Published" } else { "Unpublished" },
            hype_message: generating.then(|| hype_message(index, now)),
            view,
        }
    }
}

/// Build cards for a whole snapshot, preserving its order.
pub fn build_cards(jobs: &[Job], now: DateTime<Utc>) -> Vec<JobCard> {
    jobs.iter()
        .enumerate()
        .map(|(index, job)| JobCard::build(job, index, now))
        .collect()
}

/// `Oct 16, 2026` style date.
pub fn format_created_date(created_at: Option<DateTime<Utc>>) -> String {
    match created_at {
        Some(ts) => ts.format("%b %-d, %Y").to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}

/// Neighbouring cards are offset by their index so they do not all show the
/// same line at once.
pub fn hype_message(index: usize, now: DateTime<Utc>) -> &'static str {
    let tick = now.timestamp_millis().div_euclid(HYPE_ROTATION_MS) as usize;
    HYPE_MESSAGES[tick.wrapping_add(index) % HYPE_MESSAGES.len()]
}
