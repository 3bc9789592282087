//! Typed repository for movie job documents.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use reel_models::{Job, JobId, JobStatus, MovieInfo, Stage, StageProgress, StageState};

use crate::client::FirestoreClient;
use crate::error::FirestoreResult;
use crate::live::Subscription;
use crate::types::{
    Direction, Document, FieldOp, FromFirestoreValue, StructuredQuery, ToFirestoreValue,
};

/// Top-level collection holding every job.
pub const MOVIES_COLLECTION: &str = "movies";

/// Repository for movie documents. Cheap to clone.
#[derive(Clone)]
pub struct MovieRepository {
    client: FirestoreClient,
}

impl MovieRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    fn owner_query(user_id: &str) -> StructuredQuery {
        StructuredQuery::collection(MOVIES_COLLECTION)
            .filter("userId", FieldOp::Equal, user_id.to_firestore_value())
            .order_by("createdAt", Direction::Descending)
    }

    fn active_query(user_id: &str) -> StructuredQuery {
        StructuredQuery::collection(MOVIES_COLLECTION)
            .filter("userId", FieldOp::Equal, user_id.to_firestore_value())
            .filter(
                "status",
                FieldOp::In,
                vec![JobStatus::Queued.as_str(), JobStatus::Processing.as_str()]
                    .to_firestore_value(),
            )
    }

    /// Jobs owned by `user_id`, newest first.
    pub async fn list_for_owner(&self, user_id: &str) -> FirestoreResult<Vec<Job>> {
        self.query_jobs(Self::owner_query(user_id)).await
    }

    /// Jobs of `user_id` that are queued or processing.
    pub async fn list_active(&self, user_id: &str) -> FirestoreResult<Vec<Job>> {
        self.query_jobs(Self::active_query(user_id)).await
    }

    /// Every published movie.
    pub async fn list_published(&self) -> FirestoreResult<Vec<Job>> {
        let query = StructuredQuery::collection(MOVIES_COLLECTION).filter(
            "isPublished",
            FieldOp::Equal,
            true.to_firestore_value(),
        );
        self.query_jobs(query).await
    }

    /// The featured movie, if any document is flagged.
    pub async fn featured(&self) -> FirestoreResult<Option<Job>> {
        let query = StructuredQuery::collection(MOVIES_COLLECTION)
            .filter("featured", FieldOp::Equal, true.to_firestore_value())
            .limit(1);
        Ok(self.query_jobs(query).await?.into_iter().next())
    }

    pub async fn get(&self, job_id: &JobId) -> FirestoreResult<Option<Job>> {
        let doc = self
            .client
            .get_document(MOVIES_COLLECTION, job_id.as_str())
            .await?;
        Ok(doc.as_ref().and_then(document_to_job))
    }

    async fn query_jobs(&self, query: StructuredQuery) -> FirestoreResult<Vec<Job>> {
        let docs = self.client.run_query(query).await?;
        Ok(docs.iter().filter_map(document_to_job).collect())
    }

    // =========================================================================
    // Live queries
    // =========================================================================

    /// Live view of [`MovieRepository::list_for_owner`].
    pub fn watch_owner(&self, user_id: &str, interval: Duration) -> Subscription<Job> {
        let repo = self.clone();
        let user_id = user_id.to_string();
        Subscription::spawn("owner_jobs", interval, move || {
            let repo = repo.clone();
            let user_id = user_id.clone();
            async move { repo.list_for_owner(&user_id).await }
        })
    }

    /// Live view of [`MovieRepository::list_active`].
    pub fn watch_active(&self, user_id: &str, interval: Duration) -> Subscription<Job> {
        let repo = self.clone();
        let user_id = user_id.to_string();
        Subscription::spawn("active_jobs", interval, move || {
            let repo = repo.clone();
            let user_id = user_id.clone();
            async move { repo.list_active(&user_id).await }
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Set the publication flag and bump `updatedAt`. Nothing else is written.
    pub async fn set_published(&self, job_id: &JobId, published: bool) -> FirestoreResult<()> {
        let mut fields = HashMap::new();
        fields.insert("isPublished".to_string(), published.to_firestore_value());
        fields.insert("updatedAt".to_string(), Utc::now().to_firestore_value());

        self.client
            .update_document(
                MOVIES_COLLECTION,
                job_id.as_str(),
                fields,
                &["isPublished", "updatedAt"],
            )
            .await?;

        info!(job_id = %job_id, published, "Updated publication flag");
        Ok(())
    }

    pub async fn delete(&self, job_id: &JobId) -> FirestoreResult<()> {
        self.client
            .delete_document(MOVIES_COLLECTION, job_id.as_str())
            .await?;
        info!(job_id = %job_id, "Deleted movie");
        Ok(())
    }
}

/// Map a movie document onto [`Job`].
///
/// Every field is optional on the wire; missing or mistyped fields fall back
/// to the documented defaults. Documents without a resource name are skipped.
pub fn document_to_job(doc: &Document) -> Option<Job> {
    let Some(id) = doc.id() else {
        warn!("Skipping movie document without a name");
        return None;
    };

    let mut job = Job::new(id, doc.get::<String>("userId").unwrap_or_default());

    job.status = doc
        .get::<String>("status")
        .and_then(|s| JobStatus::parse(&s));

    job.progress = doc.field("progress").and_then(|v| v.as_map()).map(|map| {
        let mut progress = StageProgress::default();
        for stage in Stage::ALL {
            let state = map
                .get(stage.as_str())
                .and_then(String::from_firestore_value)
                .and_then(|s| StageState::parse(&s));
            progress.set(stage, state);
        }
        progress
    });

    job.is_published = doc.get::<bool>("isPublished").unwrap_or(false);
    job.featured = doc.get::<bool>("featured").unwrap_or(false);
    job.created_at = doc.get::<DateTime<Utc>>("createdAt");
    job.genre = doc.get::<String>("genre");

    if doc.field("story.movie_info").is_some() {
        job.movie_info = Some(MovieInfo {
            title: doc.get("story.movie_info.title"),
            description: doc.get("story.movie_info.description"),
            genre: doc.get("story.movie_info.genre"),
        });
    }

    job.image_urls = doc
        .get::<Vec<String>>("images.image_urls")
        .unwrap_or_default();
    job.video_url = doc
        .get::<String>("final_video")
        .filter(|s| !s.is_empty())
        .or_else(|| doc.get::<String>("video.video_url"));

    Some(job)
}
