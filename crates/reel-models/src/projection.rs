//! Job status projection.
//!
//! [`project`] turns one job document into the view the dashboard renders:
//! the active pipeline stage, a coarse lifecycle status, a display progress
//! percentage and one cell per stage for the stage bar. It is a pure function
//! of its input and never fails; missing fields mean "not yet started".

use serde::Serialize;
use std::fmt;

use crate::job::{Job, JobId, JobStatus};
use crate::stage::{Stage, StageProgress, StageState};

/// Coarse lifecycle label used for top-level display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoarseStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    /// Neither a lifecycle status nor usable stage progress is present
    Unknown,
}

impl CoarseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoarseStatus::Queued => "queued",
            CoarseStatus::Processing => "processing",
            CoarseStatus::Completed => "completed",
            CoarseStatus::Failed => "failed",
            CoarseStatus::Unknown => "unknown",
        }
    }

    /// Status text shown next to the card spinner.
    pub fn label(&self) -> &'static str {
        match self {
            CoarseStatus::Queued => "In Queue",
            CoarseStatus::Processing => "Processing",
            CoarseStatus::Completed => "Completed",
            CoarseStatus::Failed => "Failed",
            CoarseStatus::Unknown => "Unknown",
        }
    }

    /// Display progress. A fixed visualization table, not a measured fraction.
    pub fn progress_percent(&self) -> u8 {
        match self {
            CoarseStatus::Completed => 100,
            CoarseStatus::Processing => 50,
            CoarseStatus::Queued => 0,
            CoarseStatus::Failed | CoarseStatus::Unknown => 0,
        }
    }
}

impl From<JobStatus> for CoarseStatus {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Queued => CoarseStatus::Queued,
            JobStatus::Processing => CoarseStatus::Processing,
            JobStatus::Completed => CoarseStatus::Completed,
            JobStatus::Failed => CoarseStatus::Failed,
        }
    }
}

impl From<StageState> for CoarseStatus {
    fn from(state: StageState) -> Self {
        match state {
            StageState::Pending => CoarseStatus::Queued,
            StageState::Processing => CoarseStatus::Processing,
            StageState::Completed => CoarseStatus::Completed,
        }
    }
}

impl fmt::Display for CoarseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Render state of one segment of the stage bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    Pending,
    Current,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StageCell {
    pub stage: Stage,
    pub state: CellState,
}

/// Per-job derived view. Recomputed on every snapshot, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedView {
    pub job_id: JobId,
    /// Stage currently being worked on; `None` once every stage completed
    pub active_stage: Option<Stage>,
    pub status: CoarseStatus,
    pub progress_percent: u8,
    /// One cell per stage, in declared order
    pub stages: [StageCell; 3],
}

/// Project a job document into its derived view.
pub fn project(job: &Job) -> DerivedView {
    let progress = job.progress.as_ref();
    let active = active_stage(progress);
    let status = coarse_status(job.status, progress);

    DerivedView {
        job_id: job.id.clone(),
        active_stage: active,
        status,
        progress_percent: status.progress_percent(),
        stages: Stage::ALL.map(|stage| StageCell {
            stage,
            state: cell_state(stage, progress, active, status),
        }),
    }
}

/// An explicit `processing` marker wins (first one in declared order);
/// otherwise the first stage that is not `completed` is active.
pub fn active_stage(progress: Option<&StageProgress>) -> Option<Stage> {
    let state_of = |stage: Stage| progress.and_then(|p| p.get(stage));

    Stage::ALL
        .into_iter()
        .find(|&stage| state_of(stage) == Some(StageState::Processing))
        .or_else(|| {
            Stage::ALL
                .into_iter()
                .find(|&stage| state_of(stage) != Some(StageState::Completed))
        })
}

/// Lifecycle status if set; else the first declared stage's progress.
pub fn coarse_status(status: Option<JobStatus>, progress: Option<&StageProgress>) -> CoarseStatus {
    if let Some(status) = status {
        return status.into();
    }

    progress
        .and_then(|p| p.get(Stage::ALL[0]))
        .map(CoarseStatus::from)
        .unwrap_or(CoarseStatus::Unknown)
}

fn cell_state(
    stage: Stage,
    progress: Option<&StageProgress>,
    active: Option<Stage>,
    status: CoarseStatus,
) -> CellState {
    if status == CoarseStatus::Failed {
        return CellState::Failed;
    }
    if progress.is_some_and(|p| p.is_completed(stage)) {
        CellState::Completed
    } else if active == Some(stage) {
        CellState::Current
    } else {
        CellState::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        Job::new("movie-1", "user-1")
    }

    fn progress(story: StageState, images: StageState, video: StageState) -> StageProgress {
        StageProgress::default()
            .with(Stage::Story, story)
            .with(Stage::Images, images)
            .with(Stage::Video, video)
    }

    use StageState::{Completed, Pending, Processing};

    #[test]
    fn test_completed_status_is_full_progress_regardless_of_stages() {
        let cases = [
            None,
            Some(progress(Pending, Pending, Pending)),
            Some(progress(Completed, Processing, Pending)),
            Some(StageProgress::default()),
        ];
        for stages in cases {
            let mut job = job().with_status(JobStatus::Completed);
            job.progress = stages;
            let view = project(&job);
            assert_eq!(view.status, CoarseStatus::Completed);
            assert_eq!(view.progress_percent, 100);
        }
    }

    #[test]
    fn test_queued_status_is_zero_progress() {
        let cases = [None, Some(progress(Completed, Completed, Processing))];
        for stages in cases {
            let mut job = job().with_status(JobStatus::Queued);
            job.progress = stages;
            assert_eq!(project(&job).progress_percent, 0);
        }
    }

    #[test]
    fn test_processing_and_failed_percentages() {
        assert_eq!(project(&job().with_status(JobStatus::Processing)).progress_percent, 50);
        assert_eq!(project(&job().with_status(JobStatus::Failed)).progress_percent, 0);
    }

    #[test]
    fn test_explicit_processing_wins() {
        let job = job().with_progress(progress(Completed, Processing, Pending));
        assert_eq!(project(&job).active_stage, Some(Stage::Images));
    }

    #[test]
    fn test_explicit_processing_wins_over_earlier_incomplete_stage() {
        // Out-of-order reports: story still pending while video is processing.
        let job = job().with_progress(progress(Pending, Completed, Processing));
        assert_eq!(project(&job).active_stage, Some(Stage::Video));
    }

    #[test]
    fn test_first_processing_marker_wins() {
        let job = job().with_progress(progress(Completed, Processing, Processing));
        assert_eq!(project(&job).active_stage, Some(Stage::Images));
    }

    #[test]
    fn test_first_incomplete_when_no_processing_marker() {
        let job = job().with_progress(progress(Pending, Pending, Pending));
        assert_eq!(project(&job).active_stage, Some(Stage::Story));

        let job = self::job().with_progress(progress(Completed, Pending, Pending));
        assert_eq!(project(&job).active_stage, Some(Stage::Images));
    }

    #[test]
    fn test_all_completed_has_no_active_stage() {
        let job = job().with_progress(progress(Completed, Completed, Completed));
        let view = project(&job);
        assert_eq!(view.active_stage, None);
        assert!(view.stages.iter().all(|c| c.state == CellState::Completed));
    }

    #[test]
    fn test_missing_everything_is_unknown_without_error() {
        let view = project(&job());
        assert_eq!(view.status, CoarseStatus::Unknown);
        assert_eq!(view.progress_percent, 0);
        assert_eq!(view.active_stage, Some(Stage::Story));
    }

    #[test]
    fn test_empty_progress_map_is_unknown() {
        let view = project(&job().with_progress(StageProgress::default()));
        assert_eq!(view.status, CoarseStatus::Unknown);
        assert_eq!(view.active_stage, Some(Stage::Story));
    }

    #[test]
    fn test_coarse_status_falls_back_to_first_stage() {
        let job = job().with_progress(progress(Processing, Pending, Pending));
        assert_eq!(project(&job).status, CoarseStatus::Processing);
        assert_eq!(project(&job).progress_percent, 50);

        let job = self::job().with_progress(progress(Completed, Processing, Pending));
        assert_eq!(project(&job).status, CoarseStatus::Completed);

        let job = self::job().with_progress(progress(Pending, Pending, Pending));
        assert_eq!(project(&job).status, CoarseStatus::Queued);
    }

    #[test]
    fn test_lifecycle_status_takes_precedence_over_stages() {
        let job = job()
            .with_status(JobStatus::Processing)
            .with_progress(progress(Completed, Completed, Completed));
        let view = project(&job);
        assert_eq!(view.status, CoarseStatus::Processing);
        assert_eq!(view.active_stage, None);
    }

    #[test]
    fn test_stage_cells() {
        let job = job().with_progress(progress(Completed, Processing, Pending));
        let states: Vec<_> = project(&job).stages.iter().map(|c| c.state).collect();
        assert_eq!(
            states,
            vec![CellState::Completed, CellState::Current, CellState::Pending]
        );
    }

    #[test]
    fn test_failed_job_marks_every_cell_failed() {
        let job = job()
            .with_status(JobStatus::Failed)
            .with_progress(progress(Completed, Processing, Pending));
        let view = project(&job);
        assert!(view.stages.iter().all(|c| c.state == CellState::Failed));
        assert_eq!(view.active_stage, Some(Stage::Images));
    }

    #[test]
    fn test_project_is_idempotent() {
        let job = job()
            .with_status(JobStatus::Processing)
            .with_progress(progress(Completed, Processing, Pending));
        assert_eq!(project(&job), project(&job));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(CoarseStatus::Queued.label(), "In Queue");
        assert_eq!(CoarseStatus::Unknown.label(), "Unknown");
    }
}
