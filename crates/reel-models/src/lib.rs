//! Shared data models for the Reel client.
//!
//! This crate provides:
//! - The movie job document schema and pipeline stages
//! - The status projection used by the dashboard
//! - Dashboard cards and catalog grouping
//! - The submission request sent to the queue API

pub mod card;
pub mod catalog;
pub mod job;
pub mod projection;
pub mod request;
pub mod stage;

// Re-export common types
pub use card::{build_cards, JobCard};
pub use catalog::{group_by_genre, Category};
pub use job::{Job, JobId, JobStatus, MovieInfo};
pub use projection::{project, CellState, CoarseStatus, DerivedView, StageCell};
pub use request::{parse_num_sequences, MovieRequest, Sampler};
pub use stage::{Stage, StageProgress, StageState};
