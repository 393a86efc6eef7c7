//! Scripted [`HttpFetch`] double for unit tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CoverError, CoverResult};
use crate::http::HttpFetch;

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Status(u16),
}

/// Answers GETs from a list of `(url fragment, reply)` routes.
///
/// The first route whose fragment occurs in the URL wins; unrouted URLs
/// fail as network errors. Every request is recorded.
#[derive(Debug, Default)]
pub(crate) struct ScriptedFetcher {
    routes: Vec<(String, Reply)>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn body(mut self, fragment: &str, body: &str) -> Self {
        self.routes
            .push((fragment.to_string(), Reply::Body(body.to_string())));
        self
    }

    pub(crate) fn status(mut self, fragment: &str, status: u16) -> Self {
        self.routes.push((fragment.to_string(), Reply::Status(status)));
        self
    }

    pub(crate) fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_matching(&self, fragment: &str) -> usize {
        self.calls()
            .iter()
            .filter(|url| url.contains(fragment))
            .count()
    }
}

#[async_trait]
impl HttpFetch for ScriptedFetcher {
    async fn get_text(&self, url: &str) -> CoverResult<String> {
        self.calls.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .routes
            .iter()
            .find(|(fragment, _)| url.contains(fragment.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Status(status)) => Err(CoverError::NonSuccessStatus {
                url: url.to_string(),
                status,
            }),
            None => Err(CoverError::Network {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }
}
