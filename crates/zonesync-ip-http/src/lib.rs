// # HTTP IP Echo Client
//
// This crate provides the HTTP transport behind public-IP resolution.
//
// ## Purpose
//
// Public-IP echo services (e.g., api.ipify.org, icanhazip.com) answer a
// plain GET with the caller's address as the response body. This client
// performs that single GET and returns the raw body.
//
// ## Scope
//
// Interpretation of the body (trimming, emptiness, address family) is the
// resolver's job. This client only distinguishes "got a body" from
// "transport failed": network errors and non-success statuses are returned
// as transport errors, everything else is handed back verbatim.

use async_trait::async_trait;
use std::time::Duration;

use zonesync_core::traits::IpEchoClient;
use zonesync_core::{Error, Result};

/// Default HTTP timeout for echo requests (10 seconds)
///
/// Echo services answer in well under a second; anything slower than this
/// is effectively down and the run should fail instead of hanging.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based IP echo client
pub struct HttpEchoClient {
    /// HTTP client, shared across endpoint attempts
    client: reqwest::Client,
}

impl HttpEchoClient {
    /// Create a new echo client with the default timeout
    ///
    /// # Errors
    ///
    /// Transport error when the HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a new echo client with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl IpEchoClient for HttpEchoClient {
    async fn get_body(&self, url: &str) -> Result<String> {
        tracing::debug!("Fetching public IP from: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(format!(
                "{url} answered with status {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::transport(format!("failed to read body from {url}: {e}")))
    }
}
