//! Error types for cover lookups.
//!
//! None of these escape [`CoverResolver`](crate::CoverResolver): providers
//! log them and report a plain "no match".

use thiserror::Error;

/// Errors that can occur while querying an external cover source.
#[derive(Debug, Error)]
pub enum CoverError {
    /// Connection, DNS, or timeout failure.
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The source answered with a status outside the 2xx range.
    #[error("HTTP {status} from {url}")]
    NonSuccessStatus { url: String, status: u16 },

    /// The response, well-formed or not, held no usable cover reference.
    #[error("no cover reference in {source_name} response")]
    ExtractionMiss { source_name: String },

    /// A request URL could not be assembled from the configured base.
    #[error("invalid request URL: {message}")]
    InvalidUrl { message: String },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// A runtime for blocking resolution could not be started.
    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

impl CoverError {
    pub(crate) fn miss(source_name: &str) -> Self {
        Self::ExtractionMiss {
            source_name: source_name.to_string(),
        }
    }

    /// Returns `true` when a later request to the same source might
    /// succeed (transport failures and 5xx/429 answers).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::NonSuccessStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` when the source answered but had nothing to offer.
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::ExtractionMiss { .. })
    }
}

/// Convenience alias for cover lookup results.
pub type CoverResult<T> = std::result::Result<T, CoverError>;
