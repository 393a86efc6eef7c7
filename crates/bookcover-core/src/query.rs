use serde::{Deserialize, Serialize};
use std::fmt;

/// Genre assumed when a caller does not supply one.
pub const DEFAULT_GENRE: &str = "Business & Management";

/// A single cover lookup request.
///
/// Title and author drive the external searches; genre is only used to
/// colour the placeholder when no real cover is found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookQuery {
    pub title: String,

    #[serde(default)]
    pub author: String,

    #[serde(default = "default_genre")]
    pub genre: String,
}

fn default_genre() -> String {
    DEFAULT_GENRE.to_string()
}

impl BookQuery {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
        }
    }

    /// Search terms for an exact lookup: title followed by author.
    ///
    /// Falls back to the bare title when the author is blank.
    #[must_use]
    pub fn search_terms(&self) -> String {
        let title = self.title.trim();
        let author = self.author.trim();
        match (title.is_empty(), author.is_empty()) {
            (_, true) => title.to_string(),
            (true, false) => author.to_string(),
            (false, false) => format!("{title} {author}"),
        }
    }

    /// Search terms for a broad, title-only lookup.
    #[must_use]
    pub fn title_terms(&self) -> String {
        self.title.trim().to_string()
    }

    /// At most the first `limit` whitespace-separated words of the title.
    pub fn title_words(&self, limit: usize) -> impl Iterator<Item = &str> {
        self.title.split_whitespace().take(limit)
    }
}

impl fmt::Display for BookQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.author.trim().is_empty() {
            write!(f, "'{}'", self.title)
        } else {
            write!(f, "'{}' by {}", self.title, self.author)
        }
    }
}
