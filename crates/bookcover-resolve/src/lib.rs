//! Book cover resolution for bookcover.
//!
//! Queries external catalogues in a fixed priority order (Google Books,
//! then Open Library) and falls back to an offline placeholder, so every
//! call ends with a displayable image URL.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod blocking;
pub mod config;
pub mod error;
pub mod http;
pub mod provider;
pub mod resilience;
pub mod resolver;

#[cfg(test)]
mod testing;

pub use blocking::{resolve_cover, BlockingCoverResolver};
pub use config::Config;
pub use error::{CoverError, CoverResult};
pub use http::{HttpFetch, ReqwestFetcher};
pub use provider::{CoverProvider, ProviderKind};
pub use resolver::{CoverOrigin, CoverResolver, Resolution};
