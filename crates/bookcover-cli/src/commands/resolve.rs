use anyhow::{Context, Result};
use std::time::Duration;

use bookcover_core::{BookQuery, PlaceholderGenerator};
use bookcover_resolve::{Config, CoverResolver};

/// Resolve and print a cover URL for one book.
pub async fn run_resolve(
    config: &Config,
    title: String,
    author: String,
    genre: String,
    deadline_secs: Option<u64>,
    verbose: bool,
) -> Result<()> {
    let resolver = CoverResolver::new(config).context("Failed to create cover resolver")?;
    let query = BookQuery::new(title, author, genre);

    let resolution = match deadline_secs.filter(|secs| *secs > 0) {
        Some(secs) => {
            resolver
                .resolve_within(&query, Duration::from_secs(secs))
                .await
        }
        None => resolver.resolve_detailed(&query).await,
    };

    if verbose {
        println!("{}\t{}", resolution.url, resolution.origin);
    } else {
        println!("{}", resolution.url);
    }

    Ok(())
}

/// Print the offline placeholder URL for a book.
pub fn show_placeholder(config: &Config, title: &str, genre: &str) {
    println!("{}", placeholder_url(config, title, genre));
}

/// The URL `resolve` falls back to when no source has a cover.
fn placeholder_url(config: &Config, title: &str, genre: &str) -> String {
    let query = BookQuery::new(title, "", genre);
    PlaceholderGenerator::default()
        .with_base_url(config.placeholder_url.as_str())
        .generate(&query)
}
