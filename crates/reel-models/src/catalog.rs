//! Public catalog grouping.

use serde::Serialize;

use crate::job::Job;

/// A row of the public catalog: published movies sharing a genre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    /// Normalized genre key
    pub id: String,
    pub title: String,
    pub movies: Vec<Job>,
}

/// Lowercased, trimmed genre; `other` when the movie carries none.
pub fn normalize_genre(job: &Job) -> String {
    let genre = job.display_genre().map(|g| g.trim().to_lowercase());
    match genre {
        Some(g) if !g.is_empty() => g,
        _ => "other".to_string(),
    }
}

/// Group movies by genre. Categories keep the order in which their genre
/// first appears; movies keep their input order within a category.
pub fn group_by_genre(movies: impl IntoIterator<Item = Job>) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();

    for movie in movies {
        let genre = normalize_genre(&movie);
        match categories.iter_mut().find(|c| c.id == genre) {
            Some(category) => category.movies.push(movie),
            None => categories.push(Category {
                title: format!("{} Movies", capitalize(&genre)),
                id: genre,
                movies: vec![movie],
            }),
        }
    }

    categories
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
