//! Offline placeholder covers.
//!
//! When no external source yields a cover, the resolver falls back to a
//! text cover rendered by a placeholder-image service. The URL is built
//! entirely from the query, so this path never touches the network and
//! cannot fail.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::query::BookQuery;

/// Default placeholder-image service.
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://placehold.co";

/// Colour used for genres missing from the table.
pub const DEFAULT_GENRE_COLOR: &str = "1f2937";

const WIDTH: u32 = 400;
const HEIGHT: u32 = 600;
const TEXT_COLOR: &str = "ffffff";
const FONT: &str = "montserrat";
const MAX_TITLE_WORDS: usize = 3;
const WORD_SEPARATOR: &str = "+";

const BUILTIN_COLORS: &[(&str, &str)] = &[
    ("Business & Management", "1f2937"),
    ("Psychology", "7c3aed"),
    ("Self-Help", "059669"),
    ("Finance", "dc2626"),
    ("Investment", "ea580c"),
    ("Leadership", "2563eb"),
    ("Entrepreneurship", "0891b2"),
    ("Personal Finance", "16a34a"),
    ("Mindset", "9333ea"),
    ("Behavioral Economics", "be185d"),
    ("Behavioral Science", "a855f7"),
    ("Success", "f59e0b"),
    ("Productivity", "0d9488"),
    ("Personal Development", "059669"),
    ("Company Analysis", "1e40af"),
    ("Startup Strategy", "0891b2"),
    ("Innovation", "7c2d12"),
    ("Business Model", "1e293b"),
];

/// Immutable genre → background colour mapping.
///
/// Lookups are exact and case-sensitive. Colours are six hex digits
/// without a leading `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreColorTable {
    colors: HashMap<String, String>,
    default_color: String,
}

impl GenreColorTable {
    /// Build a table from `(genre, colour)` pairs.
    ///
    /// # Errors
    /// Returns an error if any colour, including the default, is not
    /// exactly six hex digits.
    pub fn new<I, G, C>(entries: I, default_color: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = (G, C)>,
        G: Into<String>,
        C: Into<String>,
    {
        let default_color = default_color.into();
        if !is_hex_color(&default_color) {
            return Err(Error::InvalidDefaultColor(default_color));
        }

        let mut colors = HashMap::new();
        for (genre, color) in entries {
            let genre = genre.into();
            let color = color.into();
            if !is_hex_color(&color) {
                return Err(Error::InvalidColor { genre, color });
            }
            colors.insert(genre, color);
        }

        Ok(Self {
            colors,
            default_color,
        })
    }

    /// Colour for `genre`, or the default colour when it is not listed.
    #[must_use]
    pub fn color_for(&self, genre: &str) -> &str {
        self.colors
            .get(genre)
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }

    #[must_use]
    pub fn default_color(&self) -> &str {
        &self.default_color
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for GenreColorTable {
    fn default() -> Self {
        let colors = BUILTIN_COLORS
            .iter()
            .map(|(genre, color)| ((*genre).to_string(), (*color).to_string()))
            .collect();
        Self {
            colors,
            default_color: DEFAULT_GENRE_COLOR.to_string(),
        }
    }
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit())
}

/// Synthesises placeholder cover URLs.
///
/// The URL has the shape
/// `{base}/400x600/{colour}/ffffff?text={words}&font=montserrat`, where
/// `words` is at most the first three title words joined with `+`.
#[derive(Debug, Clone)]
pub struct PlaceholderGenerator {
    colors: GenreColorTable,
    base_url: String,
}

impl PlaceholderGenerator {
    #[must_use]
    pub fn new(colors: GenreColorTable) -> Self {
        Self {
            colors,
            base_url: DEFAULT_PLACEHOLDER_URL.to_string(),
        }
    }

    /// Point the generator at a different placeholder service.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn colors(&self) -> &GenreColorTable {
        &self.colors
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the placeholder URL for `query`.
    #[must_use]
    pub fn generate(&self, query: &BookQuery) -> String {
        let base = &self.base_url;
        let color = self.colors.color_for(&query.genre);
        let text = placeholder_text(query);

        format!("{base}/{WIDTH}x{HEIGHT}/{color}/{TEXT_COLOR}?text={text}&font={FONT}")
    }
}

impl Default for PlaceholderGenerator {
    fn default() -> Self {
        Self::new(GenreColorTable::default())
    }
}

/// First title words, percent-encoded and joined for a query component.
fn placeholder_text(query: &BookQuery) -> String {
    query
        .title_words(MAX_TITLE_WORDS)
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join(WORD_SEPARATOR)
}
