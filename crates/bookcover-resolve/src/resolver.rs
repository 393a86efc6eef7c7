//! Prioritised cover resolution.
//!
//! The resolver walks its sources strictly in order (Google Books, then
//! Open Library) and stops at the first cover. A later source is never
//! consulted before the earlier one, including both of its search
//! phases, has finished. When every source comes up empty, or the
//! overall deadline fires, the placeholder generator supplies the URL,
//! so resolution always produces a displayable image.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use bookcover_core::{BookQuery, GenreColorTable, PlaceholderGenerator};

use crate::config::Config;
use crate::error::CoverResult;
use crate::http::{HttpFetch, ReqwestFetcher};
use crate::provider::{CoverProvider, GoogleBooksProvider, OpenLibraryProvider, ProviderKind};
use crate::resilience::AttemptThrottle;

/// Where a resolved URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverOrigin {
    /// A real cover from an external source.
    Provider(ProviderKind),
    /// No source had a cover.
    Placeholder,
    /// The overall deadline elapsed before a source answered.
    DeadlineElapsed,
}

impl fmt::Display for CoverOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(kind) => write!(f, "{kind}"),
            Self::Placeholder => f.write_str("placeholder"),
            Self::DeadlineElapsed => f.write_str("placeholder (deadline elapsed)"),
        }
    }
}

/// Outcome of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub url: String,
    pub origin: CoverOrigin,
}

impl Resolution {
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        !matches!(self.origin, CoverOrigin::Provider(_))
    }
}

/// Resolves display-ready cover URLs for books.
///
/// Holds only read-only state, so one instance can be shared (e.g. in an
/// `Arc`) across any number of concurrent resolutions.
#[derive(Debug, Clone)]
pub struct CoverResolver {
    providers: Vec<CoverProvider>,
    placeholder: PlaceholderGenerator,
    throttle: AttemptThrottle,
    deadline: Option<Duration>,
}

impl CoverResolver {
    /// Create a resolver that talks to the configured sources over HTTP.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &Config) -> CoverResult<Self> {
        let fetcher = ReqwestFetcher::new(config.request_timeout(), &config.user_agent)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Create a resolver whose sources fetch through `fetcher`.
    pub fn with_fetcher(config: &Config, fetcher: Arc<dyn HttpFetch>) -> Self {
        let providers: Vec<CoverProvider> = vec![
            GoogleBooksProvider::new(Arc::clone(&fetcher), config.google_books_url.as_str()).into(),
            OpenLibraryProvider::new(
                fetcher,
                config.open_library_url.as_str(),
                config.covers_url.as_str(),
            )
            .into(),
        ];

        Self {
            providers,
            placeholder: PlaceholderGenerator::default()
                .with_base_url(config.placeholder_url.as_str()),
            throttle: AttemptThrottle::new(config.attempt_delay()),
            deadline: config.deadline(),
        }
    }

    /// Replace the genre colours used for placeholders.
    #[must_use]
    pub fn with_colors(mut self, colors: GenreColorTable) -> Self {
        let base_url = self.placeholder.base_url().to_string();
        self.placeholder = PlaceholderGenerator::new(colors).with_base_url(base_url);
        self
    }

    /// Sources in the order they are consulted.
    #[must_use]
    pub fn provider_kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(CoverProvider::kind).collect()
    }

    /// The network-free fallback URL for `query`.
    #[must_use]
    pub fn placeholder(&self, query: &BookQuery) -> String {
        self.placeholder.generate(query)
    }

    /// Resolve a cover URL for `query`. Always returns a usable URL.
    pub async fn resolve(&self, query: &BookQuery) -> String {
        self.resolve_detailed(query).await.url
    }

    /// Resolve a cover URL and report where it came from.
    ///
    /// Honours the configured overall deadline, if any.
    pub async fn resolve_detailed(&self, query: &BookQuery) -> Resolution {
        self.consult_providers(query, self.deadline).await
    }

    /// Resolve with an explicit overall deadline.
    ///
    /// When the deadline elapses the in-flight request is dropped and the
    /// placeholder is returned straight away. A cover that has already
    /// been found is kept even if the deadline elapses during the pause
    /// that follows it.
    pub async fn resolve_within(&self, query: &BookQuery, deadline: Duration) -> Resolution {
        self.consult_providers(query, Some(deadline)).await
    }

    /// Resolve a catalogue of books one after another.
    pub async fn resolve_all(&self, queries: &[BookQuery]) -> Vec<Resolution> {
        let mut resolutions = Vec::with_capacity(queries.len());
        for query in queries {
            resolutions.push(self.resolve_detailed(query).await);
        }
        resolutions
    }

    async fn consult_providers(&self, query: &BookQuery, deadline: Option<Duration>) -> Resolution {
        let expires = deadline.map(|deadline| Instant::now() + deadline);

        for provider in &self.providers {
            if !provider.has_search_terms(query) {
                log::debug!("{} has nothing to search for {}", provider.name(), query);
                continue;
            }

            let Some(found) = within(expires, provider.lookup(query)).await else {
                return self.deadline_elapsed(query);
            };
            let found = found.filter(|url| !url.trim().is_empty());
            let paused = within(expires, self.throttle.pause()).await.is_some();

            if let Some(url) = found {
                log::info!("Cover for {} from {}", query, provider.name());
                return Resolution {
                    url,
                    origin: CoverOrigin::Provider(provider.kind()),
                };
            }
            if !paused {
                return self.deadline_elapsed(query);
            }
            log::debug!("{} had no cover for {}", provider.name(), query);
        }

        log::info!("No source had a cover for {}, using placeholder", query);
        Resolution {
            url: self.placeholder(query),
            origin: CoverOrigin::Placeholder,
        }
    }

    fn deadline_elapsed(&self, query: &BookQuery) -> Resolution {
        log::warn!("Cover lookup for {} ran past its deadline, using placeholder", query);
        Resolution {
            url: self.placeholder(query),
            origin: CoverOrigin::DeadlineElapsed,
        }
    }
}

/// Run `future` to completion, or until `expires` if set.
///
/// Returns `None` when the deadline passed first; the future is dropped.
async fn within<F: Future>(expires: Option<Instant>, future: F) -> Option<F::Output> {
    match expires {
        Some(at) => tokio::time::timeout_at(at, future).await.ok(),
        None => Some(future.await),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::testing::ScriptedFetcher;

    const GOOGLE_HIT: &str = r#"{"items": [{"volumeInfo": {"imageLinks": {
        "thumbnail": "http://books.google.com/books/content?id=abc&printsec=frontcover&img=1&zoom=1&source=gbs_api"
    }}}]}"#;
    const OPEN_LIBRARY_HIT: &str = r#"{"docs": [{"cover_i": 8231856}]}"#;

    fn fast_config() -> Config {
        Config {
            attempt_delay_ms: 0,
            ..Config::default()
        }
    }

    fn resolver(fetcher: &Arc<ScriptedFetcher>) -> CoverResolver {
        CoverResolver::with_fetcher(&fast_config(), fetcher.clone())
    }

    fn rich_dad() -> BookQuery {
        BookQuery::new("Rich Dad Poor Dad", "Robert Kiyosaki", "Personal Finance")
    }

    #[test]
    fn test_provider_order() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        assert_eq!(
            resolver(&fetcher).provider_kinds(),
            vec![ProviderKind::GoogleBooks, ProviderKind::OpenLibrary]
        );
    }

    #[tokio::test]
    async fn test_primary_hit_short_circuits() {
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .body("googleapis", GOOGLE_HIT)
                .body("openlibrary", OPEN_LIBRARY_HIT),
        );
        let resolution = resolver(&fetcher).resolve_detailed(&rich_dad()).await;

        assert_eq!(resolution.origin, CoverOrigin::Provider(ProviderKind::GoogleBooks));
        assert!(resolution.url.contains("zoom=3"));
        assert!(!resolution.url.contains("zoom=1"));
        assert_eq!(fetcher.calls_matching("googleapis"), 1);
        assert_eq!(fetcher.calls_matching("openlibrary"), 0);
    }

    #[tokio::test]
    async fn test_secondary_used_when_primary_fails() {
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .status("googleapis", 503)
                .body("openlibrary", OPEN_LIBRARY_HIT),
        );
        let resolution = resolver(&fetcher).resolve_detailed(&rich_dad()).await;

        assert_eq!(resolution.origin, CoverOrigin::Provider(ProviderKind::OpenLibrary));
        assert_eq!(
            resolution.url,
            "https://covers.openlibrary.org/b/id/8231856-L.jpg"
        );
        // both primary phases ran before the secondary was asked
        assert_eq!(fetcher.calls_matching("googleapis"), 2);
        let calls = fetcher.calls();
        assert!(calls[0].contains("googleapis"));
        assert!(calls[1].contains("googleapis"));
        assert!(calls[2].contains("openlibrary"));
    }

    #[tokio::test]
    async fn test_all_sources_unreachable_returns_placeholder() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let resolver = resolver(&fetcher);
        let query = rich_dad();

        let resolution = resolver.resolve_detailed(&query).await;
        assert_eq!(resolution.origin, CoverOrigin::Placeholder);
        assert!(resolution.is_placeholder());
        assert_eq!(resolution.url, PlaceholderGenerator::default().generate(&query));
        assert!(resolution.url.contains("16a34a"));
        assert!(resolution.url.contains("text=Rich+Dad+Poor"));
        assert_eq!(fetcher.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_empty_responses_return_placeholder() {
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .body("googleapis", r#"{"totalItems": 0}"#)
                .body("openlibrary", r#"{"numFound": 0, "docs": []}"#),
        );
        let url = resolver(&fetcher).resolve(&rich_dad()).await;
        assert!(url.starts_with("https://placehold.co/400x600/16a34a/"));
    }

    #[tokio::test]
    async fn test_blank_query_still_resolves() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let url = resolver(&fetcher)
            .resolve(&BookQuery::new("", "", ""))
            .await;
        assert!(!url.is_empty());
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_skips_pause() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let resolver = CoverResolver::with_fetcher(&Config::default(), fetcher.clone());

        let start = Instant::now();
        let resolution = resolver.resolve_detailed(&BookQuery::new("", "", "")).await;

        assert_eq!(resolution.origin, CoverOrigin::Placeholder);
        assert!(fetcher.calls().is_empty());
        assert!(start.elapsed() < Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_cover_kept_when_deadline_passes_during_pause() {
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .body("googleapis", GOOGLE_HIT)
                .delay(Duration::from_millis(100)),
        );
        let config = Config {
            attempt_delay_ms: 300,
            ..Config::default()
        };
        let resolver = CoverResolver::with_fetcher(&config, fetcher.clone());

        let start = Instant::now();
        let resolution = resolver
            .resolve_within(&rich_dad(), Duration::from_millis(250))
            .await;

        assert_eq!(resolution.origin, CoverOrigin::Provider(ProviderKind::GoogleBooks));
        assert!(resolution.url.contains("zoom=3"));
        assert_eq!(fetcher.calls_matching("googleapis"), 1);
        // the pause is still cut short by the deadline
        assert!(start.elapsed() < Duration::from_millis(380));
    }

    #[tokio::test]
    async fn test_deadline_during_pause_after_miss() {
        let fetcher = Arc::new(ScriptedFetcher::new().body("openlibrary", OPEN_LIBRARY_HIT));
        let config = Config {
            attempt_delay_ms: 300,
            ..Config::default()
        };
        let resolver = CoverResolver::with_fetcher(&config, fetcher.clone());

        let resolution = resolver
            .resolve_within(&rich_dad(), Duration::from_millis(100))
            .await;

        assert_eq!(resolution.origin, CoverOrigin::DeadlineElapsed);
        assert_eq!(fetcher.calls_matching("openlibrary"), 0);
    }

    #[tokio::test]
    async fn test_deadline_returns_placeholder() {
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .body("googleapis", GOOGLE_HIT)
                .delay(Duration::from_secs(5)),
        );
        let resolver = resolver(&fetcher);
        let query = rich_dad();

        let start = Instant::now();
        let resolution = resolver
            .resolve_within(&query, Duration::from_millis(100))
            .await;

        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(resolution.origin, CoverOrigin::DeadlineElapsed);
        assert_eq!(resolution.url, resolver.placeholder(&query));
        assert_eq!(fetcher.calls_matching("openlibrary"), 0);
    }

    #[tokio::test]
    async fn test_configured_deadline_applies() {
        let fetcher = Arc::new(ScriptedFetcher::new().delay(Duration::from_secs(5)));
        let config = Config {
            deadline_secs: Some(1),
            ..fast_config()
        };
        let resolver = CoverResolver::with_fetcher(&config, fetcher.clone());

        let resolution = resolver.resolve_detailed(&rich_dad()).await;
        assert_eq!(resolution.origin, CoverOrigin::DeadlineElapsed);
    }

    #[tokio::test]
    async fn test_throttle_applies_per_attempt() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let config = Config {
            attempt_delay_ms: 40,
            ..Config::default()
        };
        let resolver = CoverResolver::with_fetcher(&config, fetcher.clone());

        let start = Instant::now();
        let resolution = resolver.resolve_detailed(&rich_dad()).await;
        assert!(resolution.is_placeholder());
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn test_custom_colors() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let colors = GenreColorTable::new([("Personal Finance", "000000")], "ffffff").unwrap();
        let resolver = resolver(&fetcher).with_colors(colors);

        let url = resolver.resolve(&rich_dad()).await;
        assert!(url.starts_with("https://placehold.co/400x600/000000/"));
    }

    #[tokio::test]
    async fn test_resolve_all_keeps_order() {
        let fetcher = Arc::new(ScriptedFetcher::new().body("Atomic", GOOGLE_HIT));
        let queries = vec![
            rich_dad(),
            BookQuery::new("Atomic Habits", "James Clear", "Productivity"),
        ];

        let resolutions = resolver(&fetcher).resolve_all(&queries).await;
        assert_eq!(resolutions.len(), 2);
        assert_eq!(resolutions[0].origin, CoverOrigin::Placeholder);
        assert_eq!(
            resolutions[1].origin,
            CoverOrigin::Provider(ProviderKind::GoogleBooks)
        );
    }

    #[tokio::test]
    async fn test_concurrent_resolutions() {
        let fetcher = Arc::new(ScriptedFetcher::new().body("openlibrary", OPEN_LIBRARY_HIT));
        let resolver = Arc::new(resolver(&fetcher));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let resolver = Arc::clone(&resolver);
                tokio::spawn(async move {
                    let query = BookQuery::new(format!("Book {i}"), "Author", "Finance");
                    resolver.resolve(&query).await
                })
            })
            .collect();

        for handle in handles {
            let url = handle.await.unwrap();
            assert_eq!(url, "https://covers.openlibrary.org/b/id/8231856-L.jpg");
        }
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(
            CoverOrigin::Provider(ProviderKind::OpenLibrary).to_string(),
            "Open Library"
        );
        assert_eq!(CoverOrigin::Placeholder.to_string(), "placeholder");
    }
}
