//! Movie dashboard for a signed-in user.
//!
//! This crate provides:
//! - The dashboard session (live job list, publish toggle, delete)
//! - The active-jobs badge
//! - The public catalog loader
//! - The submission form
//! - Configuration and tracing setup for the binary

pub mod badge;
pub mod catalog;
pub mod config;
pub mod create;
pub mod error;
pub mod session;
pub mod telemetry;

pub use badge::ActiveJobsBadge;
pub use catalog::{load_catalog, Catalog};
pub use config::DashboardConfig;
pub use create::CreateForm;
pub use error::{DashboardError, DashboardResult, DELETE_FAILED, LOAD_FAILED, PUBLISH_FAILED};
pub use session::{Confirm, DashboardSession, DashboardState, DeleteOutcome, DELETE_PROMPT};
