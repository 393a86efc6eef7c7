//! Core domain model for bookcover.
//!
//! Holds the request value ([`BookQuery`]) and the pure, network-free
//! placeholder cover synthesis ([`PlaceholderGenerator`]) that backs every
//! resolution when the external sources come up empty.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod placeholder;
pub mod query;

pub use error::{Error, Result};
pub use placeholder::{GenreColorTable, PlaceholderGenerator};
pub use query::{BookQuery, DEFAULT_GENRE};
