//! Synchronous entry point for callers without an async runtime.

use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};

use bookcover_core::{BookQuery, PlaceholderGenerator};

use crate::config::Config;
use crate::error::CoverResult;
use crate::resolver::CoverResolver;

/// A [`CoverResolver`] paired with its own tokio runtime.
#[derive(Debug)]
pub struct BlockingCoverResolver {
    runtime: Runtime,
    resolver: CoverResolver,
}

impl BlockingCoverResolver {
    /// # Errors
    /// Returns an error if the runtime or the HTTP client cannot be
    /// created.
    pub fn new(config: &Config) -> CoverResult<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("bookcover")
            .enable_all()
            .build()?;
        let resolver = CoverResolver::new(config)?;
        Ok(Self { runtime, resolver })
    }

    /// Resolve a cover URL, blocking the current thread.
    ///
    /// Safe to call from inside another tokio runtime: the work then runs
    /// on a short-lived helper thread.
    pub fn resolve(&self, query: &BookQuery) -> String {
        if Handle::try_current().is_err() {
            return self.runtime.block_on(self.resolver.resolve(query));
        }

        std::thread::scope(|scope| {
            scope
                .spawn(|| self.runtime.block_on(self.resolver.resolve(query)))
                .join()
        })
        .unwrap_or_else(|_| {
            log::error!("Cover resolution thread panicked for {}", query);
            self.resolver.placeholder(query)
        })
    }
}

static SHARED: OnceLock<Option<BlockingCoverResolver>> = OnceLock::new();

fn shared() -> Option<&'static BlockingCoverResolver> {
    SHARED
        .get_or_init(|| {
            let config = Config::load().unwrap_or_else(|e| {
                log::warn!("Failed to load bookcover config, using defaults: {:#}", e);
                Config::default()
            });
            BlockingCoverResolver::new(&config)
                .map_err(|e| log::error!("Cover resolver unavailable: {}", e))
                .ok()
        })
        .as_ref()
}

/// Resolve a display-ready cover URL for a book.
///
/// The returned URL is never empty: it is a real cover when Google Books
/// or Open Library has one, and a genre-coloured placeholder otherwise.
/// Uses a process-wide resolver built from [`Config::load`] on first use.
pub fn resolve_cover(title: &str, author: &str, genre: &str) -> String {
    let query = BookQuery::new(title, author, genre);
    match shared() {
        Some(resolver) => resolver.resolve(&query),
        None => PlaceholderGenerator::default().generate(&query),
    }
}
