//! One-shot HTTP GET for cover sources.
//!
//! Providers talk to the network only through [`HttpFetch`], which keeps
//! them testable against scripted responses and lets the resolver drop
//! an in-flight request when its deadline fires.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::error::{CoverError, CoverResult};

/// Fetches the body of a URL as text.
#[async_trait]
pub trait HttpFetch: Send + Sync + std::fmt::Debug {
    /// GET `url` and return the body.
    ///
    /// Transport failures and timeouts map to [`CoverError::Network`];
    /// answers outside 2xx map to [`CoverError::NonSuccessStatus`].
    async fn get_text(&self, url: &str) -> CoverResult<String>;
}

/// [`HttpFetch`] backed by `reqwest`.
///
/// Every request carries its own connect and total timeout and idle
/// connections are not kept, so each fetch stands alone.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    http: Client,
}

impl ReqwestFetcher {
    /// Create a fetcher with the given per-request timeout.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(timeout: Duration, user_agent: &str) -> CoverResult<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self { http })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get_text(&self, url: &str) -> CoverResult<String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoverError::NonSuccessStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| network_error(url, &e))
    }
}

fn network_error(url: &str, error: &reqwest::Error) -> CoverError {
    let message = if error.is_timeout() {
        format!("timed out: {error}")
    } else {
        error.to_string()
    };
    CoverError::Network {
        url: url.to_string(),
        message,
    }
}

/// Append URL-encoded query parameters to `base`.
///
/// Spaces are encoded as `+`.
pub fn build_url(base: &str, params: &[(&str, &str)]) -> CoverResult<String> {
    Url::parse_with_params(base, params)
        .map(String::from)
        .map_err(|e| CoverError::InvalidUrl {
            message: format!("{base}: {e}"),
        })
}
