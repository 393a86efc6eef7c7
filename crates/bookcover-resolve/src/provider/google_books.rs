//! Google Books cover source (primary).
//!
//! Queries the public volumes search endpoint and takes the first
//! `imageLinks.thumbnail` found in the response. Thumbnails come back at
//! the low-resolution `zoom=1`; the URL is rewritten to request `zoom=3`
//! before it is returned.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Deserialize;

use bookcover_core::BookQuery;

use crate::error::{CoverError, CoverResult};
use crate::http::{build_url, HttpFetch};
use crate::provider::{decode_json_string, plan_phases, SearchPhase};

/// Public volumes search endpoint.
pub const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes";

const SOURCE_NAME: &str = "Google Books";
const EXACT_LIMIT: u8 = 1;
const BROAD_LIMIT: u8 = 3;

static THUMBNAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""thumbnail"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("thumbnail pattern is valid")
});

static LOW_RES_ZOOM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]zoom=1").expect("zoom pattern is valid"));

// ---------------------------------------------------------------------------
// Response types (private -- only the image links are of interest)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    #[serde(rename = "volumeInfo", default)]
    volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Deserialize)]
struct VolumeInfo {
    #[serde(rename = "imageLinks", default)]
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
struct ImageLinks {
    #[serde(default)]
    thumbnail: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Primary cover source backed by the Google Books volumes API.
///
/// The exact phase asks for a single best match; the broad, title-only
/// phase asks for up to three candidates.
#[derive(Debug, Clone)]
pub struct GoogleBooksProvider {
    fetcher: Arc<dyn HttpFetch>,
    search_url: String,
}

impl GoogleBooksProvider {
    pub fn new(fetcher: Arc<dyn HttpFetch>, search_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            search_url: search_url.into(),
        }
    }

    pub(crate) fn phases(&self, query: &BookQuery) -> Vec<SearchPhase> {
        plan_phases(query, EXACT_LIMIT, BROAD_LIMIT)
    }

    pub(crate) async fn search(&self, phase: &SearchPhase) -> CoverResult<String> {
        let limit = phase.limit.to_string();
        let url = build_url(
            &self.search_url,
            &[("q", phase.terms.as_str()), ("maxResults", limit.as_str())],
        )?;

        let body = self.fetcher.get_text(&url).await?;
        extract_thumbnail(&body).ok_or_else(|| CoverError::miss(SOURCE_NAME))
    }
}

/// Find the first thumbnail in a volumes response and upgrade its
/// resolution.
///
/// Well-formed responses are read structurally in result order. Bodies
/// that do not parse as a volumes document are scanned as raw text for
/// the first `"thumbnail": "..."` pair.
pub fn extract_thumbnail(body: &str) -> Option<String> {
    let thumbnail = match serde_json::from_str::<VolumesResponse>(body) {
        Ok(response) => response
            .items
            .into_iter()
            .filter_map(|volume| volume.volume_info?.image_links?.thumbnail)
            .find(|url| !url.trim().is_empty()),
        Err(e) => {
            log::debug!("{SOURCE_NAME} response is not a volumes document ({e}), scanning text");
            scan_thumbnail(body)
        }
    }?;

    Some(upgrade_zoom(thumbnail.trim()))
}

fn scan_thumbnail(body: &str) -> Option<String> {
    THUMBNAIL_PATTERN
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| decode_json_string(m.as_str()))
        .find(|url| !url.trim().is_empty())
}

/// Rewrite a low-resolution `zoom=1` parameter to `zoom=3`.
///
/// Only a whole `zoom=1` parameter is touched; `zoom=10` and URLs without
/// a zoom parameter pass through unchanged.
pub fn upgrade_zoom(url: &str) -> String {
    let mut upgraded = String::with_capacity(url.len());
    let mut copied = 0;
    for found in LOW_RES_ZOOM.find_iter(url) {
        let rest = &url[found.end()..];
        if rest.is_empty() || rest.starts_with(['&', '#']) {
            // swap the trailing "1" for "3"
            upgraded.push_str(&url[copied..found.end() - 1]);
            upgraded.push('3');
            copied = found.end();
        }
    }
    upgraded.push_str(&url[copied..]);
    upgraded
}
