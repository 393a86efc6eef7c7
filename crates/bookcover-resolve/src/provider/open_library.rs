//! Open Library cover source (secondary).
//!
//! Searches the Open Library catalogue and builds a large cover-image URL
//! from the first positive `cover_i` identifier in the results.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Deserialize;

use bookcover_core::BookQuery;

use crate::error::{CoverError, CoverResult};
use crate::http::{build_url, HttpFetch};
use crate::provider::{plan_phases, SearchPhase};

/// Catalogue search endpoint.
pub const OPEN_LIBRARY_URL: &str = "https://openlibrary.org/search.json";

/// Cover image host.
pub const OPEN_LIBRARY_COVERS_URL: &str = "https://covers.openlibrary.org";

const SOURCE_NAME: &str = "Open Library";
const RESULT_LIMIT: u8 = 3;

static COVER_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""cover_i"\s*:\s*(\d+)"#).expect("cover_i pattern is valid"));

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(default)]
    cover_i: Option<i64>,
}

/// Secondary cover source backed by the Open Library search API.
///
/// Both phases request up to three candidates; the search terms go in
/// the `title` parameter.
#[derive(Debug, Clone)]
pub struct OpenLibraryProvider {
    fetcher: Arc<dyn HttpFetch>,
    search_url: String,
    covers_url: String,
}

impl OpenLibraryProvider {
    pub fn new(
        fetcher: Arc<dyn HttpFetch>,
        search_url: impl Into<String>,
        covers_url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            search_url: search_url.into(),
            covers_url: covers_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn phases(&self, query: &BookQuery) -> Vec<SearchPhase> {
        plan_phases(query, RESULT_LIMIT, RESULT_LIMIT)
    }

    pub(crate) async fn search(&self, phase: &SearchPhase) -> CoverResult<String> {
        let limit = phase.limit.to_string();
        let url = build_url(
            &self.search_url,
            &[("title", phase.terms.as_str()), ("limit", limit.as_str())],
        )?;

        let body = self.fetcher.get_text(&url).await?;
        let cover_id = extract_cover_id(&body).ok_or_else(|| CoverError::miss(SOURCE_NAME))?;
        Ok(self.cover_url(cover_id))
    }

    /// Large cover image URL for an Open Library cover identifier.
    #[must_use]
    pub fn cover_url(&self, cover_id: u64) -> String {
        format!("{}/b/id/{cover_id}-L.jpg", self.covers_url)
    }
}

/// Find the first positive cover identifier in a search response.
///
/// Bodies that do not parse as a search document are scanned as raw text
/// for the first `"cover_i": <digits>` pair.
pub fn extract_cover_id(body: &str) -> Option<u64> {
    match serde_json::from_str::<SearchResponse>(body) {
        Ok(response) => response
            .docs
            .iter()
            .filter_map(|doc| doc.cover_i)
            .find_map(|id| u64::try_from(id).ok().filter(|id| *id > 0)),
        Err(e) => {
            log::debug!("{SOURCE_NAME} response is not a search document ({e}), scanning text");
            COVER_ID_PATTERN
                .captures_iter(body)
                .filter_map(|caps| caps.get(1)?.as_str().parse::<u64>().ok())
                .find(|id| *id > 0)
        }
    }
}
