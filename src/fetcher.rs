//! Outbound page fetching.
//!
//! The [`Fetch`] trait is the seam between the pipeline and the network:
//! [`HttpFetcher`] is the production implementation, tests plug in
//! in-memory stubs.
//!
//! One call issues exactly one GET. There are no retries, and redirects
//! follow `reqwest`'s default policy. The response is either consumed or
//! dropped before returning, which releases its connection.

use crate::models::RawDocument;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, instrument};

/// Why a page could not be fetched.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// Connecting, sending, or waiting for headers failed (including timeouts).
    #[error("request to {address} failed: {source}")]
    Request {
        address: String,
        #[source]
        source: reqwest::Error,
    },

    /// The site answered with a non-2xx status.
    #[error("{address} returned HTTP {status}")]
    Status { address: String, status: u16 },

    /// The response body could not be read or decoded.
    #[error("failed to read body from {address}: {source}")]
    Body {
        address: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Source of raw pages for the pipeline.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch a single page.
    ///
    /// # Arguments
    ///
    /// * `address` - Absolute URL of the page
    ///
    /// # Returns
    ///
    /// The decoded body and its declared content type, or a [`FetchError`]
    /// on transport failure, non-success status, or unreadable body.
    async fn fetch(&self, address: &str) -> Result<RawDocument, FetchError>;
}

/// [`Fetch`] implementation backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Wrap an existing client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a fetcher with its own client.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Sent as the `User-Agent` header on every request
    /// * `timeout` - Per-request deadline; `None` waits indefinitely
    ///
    /// # Returns
    ///
    /// The fetcher, or the `reqwest` error if the client cannot be built
    /// (e.g. the TLS backend fails to initialize).
    pub fn with_options(user_agent: &str, timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::new(builder.build()?))
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%address))]
    async fn fetch(&self, address: &str) -> Result<RawDocument, FetchError> {
        let response = self
            .client
            .get(address)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                address: address.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                address: address.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(|source| FetchError::Body {
            address: address.to_string(),
            source,
        })?;

        debug!(bytes = body.len(), content_type = ?content_type, "Fetched page");
        Ok(RawDocument { body, content_type })
    }
}
