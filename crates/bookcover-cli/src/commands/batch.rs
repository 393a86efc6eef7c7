use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use bookcover_core::BookQuery;
use bookcover_resolve::{Config, CoverResolver, Resolution};

/// One catalogue entry with its resolved cover.
#[derive(Debug, Serialize)]
pub struct CatalogueCover {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub cover_image_url: String,
    pub origin: String,
}

impl CatalogueCover {
    fn new(query: BookQuery, resolution: Resolution) -> Self {
        Self {
            title: query.title,
            author: query.author,
            genre: query.genre,
            cover_image_url: resolution.url,
            origin: resolution.origin.to_string(),
        }
    }
}

/// Read a JSON array of books.
pub fn read_catalogue(path: &Path) -> Result<Vec<BookQuery>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalogue {}", path.display()))?;
    let books: Vec<BookQuery> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse catalogue {}", path.display()))?;
    Ok(books)
}

/// Resolve covers for every book in the catalogue at `path` and print
/// the results as JSON.
pub async fn run_batch(config: &Config, path: &Path) -> Result<()> {
    let books = read_catalogue(path)?;
    log::info!("Resolving covers for {} books", books.len());

    let resolver = CoverResolver::new(config).context("Failed to create cover resolver")?;
    let resolutions = resolver.resolve_all(&books).await;

    let placeholders = resolutions.iter().filter(|r| r.is_placeholder()).count();
    log::info!(
        "Resolved {} covers ({} placeholders)",
        resolutions.len(),
        placeholders
    );

    let covers: Vec<CatalogueCover> = books
        .into_iter()
        .zip(resolutions)
        .map(|(query, resolution)| CatalogueCover::new(query, resolution))
        .collect();

    println!("{}", serde_json::to_string_pretty(&covers)?);

    Ok(())
}
