//! Firestore REST API client.
//!
//! This crate provides:
//! - Typed repository for movie job documents
//! - Polling live queries with an owned cancellation handle
//! - ID token or service account authentication via gcp_auth
//! - Request tracing and metrics

pub mod client;
pub mod error;
pub mod live;
pub mod metrics;
pub mod movies;
pub mod token_cache;
pub mod types;

pub use client::{FirestoreClient, FirestoreConfig};
pub use error::{FirestoreError, FirestoreResult};
pub use live::Subscription;
pub use movies::{document_to_job, MovieRepository, MOVIES_COLLECTION};
pub use token_cache::TokenSource;
pub use types::{Document, FromFirestoreValue, StructuredQuery, ToFirestoreValue, Value};
