//! Fetch capability
//!
//! Every network or disk read in the pipeline goes through a [`Fetcher`]. The
//! fetcher is injected into feed controllers and the detail modal, so the
//! pipeline never decides for itself where documents live.

mod fs;
mod http;

pub use fs::FsFetcher;
pub use http::HttpFetcher;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::FetchError;

/// Retrieves text resources by site-relative path
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the body of `path` as text. Suspends until the resource resolves.
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError>;
}

/// Wraps a fetcher with an optional per-request timeout
pub struct Timed<F> {
    inner: F,
    timeout: Option<Duration>,
}

impl<F: Fetcher> Timed<F> {
    pub fn new(inner: F, timeout: Option<Duration>) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for Timed<F> {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        match self.timeout {
            None => self.inner.fetch_text(path).await,
            Some(limit) => match tokio::time::timeout(limit, self.inner.fetch_text(path)).await
            {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout {
                    path: path.to_string(),
                    millis: limit.as_millis() as u64,
                }),
            },
        }
    }
}
