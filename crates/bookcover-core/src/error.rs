use thiserror::Error;

/// Errors raised while building core configuration values.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid colour {color:?} for genre {genre:?}: expected six hex digits")]
    InvalidColor { genre: String, color: String },

    #[error("invalid default colour {0:?}: expected six hex digits")]
    InvalidDefaultColor(String),
}

pub type Result<T> = std::result::Result<T, Error>;
