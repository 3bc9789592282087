//! Public catalog: published movies by genre plus the featured movie.

use tracing::{debug, warn};

use reel_firestore::MovieRepository;
use reel_models::{group_by_genre, Category, Job};

use crate::error::DashboardResult;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub featured: Option<Job>,
    pub categories: Vec<Category>,
}

/// Load the catalog. A failed featured lookup only hides the hero slot.
pub async fn load_catalog(repo: &MovieRepository) -> DashboardResult<Catalog> {
    let (published, featured) = tokio::join!(repo.list_published(), repo.featured());

    let featured = featured.unwrap_or_else(|e| {
        warn!("Error fetching featured movie: {}", e);
        None
    });

    let categories = group_by_genre(published?);
    debug!(categories = categories.len(), "Catalog loaded");

    Ok(Catalog {
        featured,
        categories,
    })
}
