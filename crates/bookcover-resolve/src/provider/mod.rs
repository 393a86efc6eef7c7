//! External cover sources.
//!
//! Each source runs a two-phase search: an exact title + author query
//! first, then a broader title-only query. The first phase that yields a
//! cover wins; failures of any kind are logged and reported as `None`.

pub mod google_books;
pub mod open_library;

use std::fmt;

use serde::Serialize;

use bookcover_core::BookQuery;

use crate::error::CoverResult;

pub use google_books::GoogleBooksProvider;
pub use open_library::OpenLibraryProvider;

/// Identifies an external cover source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    GoogleBooks,
    OpenLibrary,
}

impl ProviderKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GoogleBooks => "Google Books",
            Self::OpenLibrary => "Open Library",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One sub-attempt of a provider search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPhase {
    /// Short label used in logs ("title+author" or "title").
    pub label: &'static str,
    /// Free-text search terms.
    pub terms: String,
    /// Maximum number of candidates requested.
    pub limit: u8,
}

/// Plan the exact and broad phases for `query`.
///
/// Phases with blank terms are dropped, as is a broad phase identical to
/// the exact one (same terms and limit), which happens when the author
/// is blank.
pub(crate) fn plan_phases(query: &BookQuery, exact_limit: u8, broad_limit: u8) -> Vec<SearchPhase> {
    let candidates = [
        SearchPhase {
            label: "title+author",
            terms: query.search_terms(),
            limit: exact_limit,
        },
        SearchPhase {
            label: "title",
            terms: query.title_terms(),
            limit: broad_limit,
        },
    ];

    let mut phases: Vec<SearchPhase> = Vec::with_capacity(candidates.len());
    for phase in candidates {
        if phase.terms.is_empty() {
            continue;
        }
        let repeats_previous = phases
            .last()
            .is_some_and(|prev| prev.terms == phase.terms && prev.limit == phase.limit);
        if !repeats_previous {
            phases.push(phase);
        }
    }
    phases
}

/// The closed set of cover sources, consulted in a fixed order by the
/// resolver.
#[derive(Debug, Clone)]
pub enum CoverProvider {
    GoogleBooks(GoogleBooksProvider),
    OpenLibrary(OpenLibraryProvider),
}

impl CoverProvider {
    #[must_use]
    pub const fn kind(&self) -> ProviderKind {
        match self {
            Self::GoogleBooks(_) => ProviderKind::GoogleBooks,
            Self::OpenLibrary(_) => ProviderKind::OpenLibrary,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn phases(&self, query: &BookQuery) -> Vec<SearchPhase> {
        match self {
            Self::GoogleBooks(provider) => provider.phases(query),
            Self::OpenLibrary(provider) => provider.phases(query),
        }
    }

    async fn search(&self, phase: &SearchPhase) -> CoverResult<String> {
        match self {
            Self::GoogleBooks(provider) => provider.search(phase).await,
            Self::OpenLibrary(provider) => provider.search(phase).await,
        }
    }

    /// Whether `query` leaves this provider anything to search for.
    ///
    /// A provider without search terms makes no request, so the resolver
    /// skips it without pausing.
    #[must_use]
    pub fn has_search_terms(&self, query: &BookQuery) -> bool {
        !self.phases(query).is_empty()
    }

    /// Look up a cover URL for `query`.
    ///
    /// Runs the phases in order and stops at the first hit. Never fails:
    /// network errors, bad statuses, and empty responses all come back
    /// as `None`.
    pub async fn lookup(&self, query: &BookQuery) -> Option<String> {
        for phase in self.phases(query) {
            match self.search(&phase).await {
                Ok(url) => {
                    log::debug!(
                        "{} matched {} in {} phase: {}",
                        self.name(),
                        query,
                        phase.label,
                        url
                    );
                    return Some(url);
                }
                Err(e) if e.is_miss() => {
                    log::debug!("{} {} phase: no cover for {}", self.name(), phase.label, query);
                }
                Err(e) => {
                    log::warn!(
                        "{} {} phase failed for {}: {}",
                        self.name(),
                        phase.label,
                        query,
                        e
                    );
                }
            }
        }
        None
    }
}

impl From<GoogleBooksProvider> for CoverProvider {
    fn from(provider: GoogleBooksProvider) -> Self {
        Self::GoogleBooks(provider)
    }
}

impl From<OpenLibraryProvider> for CoverProvider {
    fn from(provider: OpenLibraryProvider) -> Self {
        Self::OpenLibrary(provider)
    }
}

/// Decode the body of a JSON string literal captured by a raw-text scan.
///
/// Falls back to the captured text when it is not a valid JSON string.
pub(crate) fn decode_json_string(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}
