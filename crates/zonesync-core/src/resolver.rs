//! Public IP resolution over an ordered list of echo endpoints
//!
//! The resolver walks its endpoint list in order and stops at the first
//! non-empty body. Endpoint errors are not absorbed: a refused connection or
//! a non-success status on the first endpoint fails the run even if a later
//! endpoint would have answered. Only an empty body falls through.

use tracing::{debug, info};

use crate::record::ResolvedAddress;
use crate::traits::IpEchoClient;
use crate::{Error, Result};

/// Resolves the caller's public IP by querying echo endpoints in order
pub struct PublicIpResolver {
    client: Box<dyn IpEchoClient>,
    endpoints: Vec<String>,
}

impl std::fmt::Debug for PublicIpResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicIpResolver")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl PublicIpResolver {
    /// Create a resolver over an ordered endpoint list
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `endpoints` is empty.
    pub fn new(client: Box<dyn IpEchoClient>, endpoints: Vec<String>) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(Error::config("at least one IP-echo endpoint is required"));
        }
        Ok(Self { client, endpoints })
    }

    /// Convenience constructor for a single endpoint
    pub fn single(client: Box<dyn IpEchoClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoints: vec![endpoint.into()],
        }
    }

    /// The endpoints this resolver queries, in order
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Resolve the current public IP
    ///
    /// Queries each endpoint in order and returns the first non-empty body,
    /// trimmed and classified. Transport errors propagate immediately
    /// without consulting later endpoints.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] from the first endpoint that fails outright
    /// - [`Error::NoPublicIp`] when every endpoint returned an empty body,
    ///   carrying the full attempted endpoint list
    pub async fn resolve(&self) -> Result<ResolvedAddress> {
        for endpoint in &self.endpoints {
            debug!(endpoint = %endpoint, "querying IP-echo endpoint");
            let body = self.client.get_body(endpoint).await?;

            match ResolvedAddress::from_body(&body) {
                Some(resolved) => {
                    info!(
                        address = %resolved.address,
                        kind = %resolved.kind,
                        endpoint = %endpoint,
                        "resolved public IP"
                    );
                    return Ok(resolved);
                }
                None => {
                    debug!(endpoint = %endpoint, "endpoint returned empty body, trying next");
                }
            }
        }

        Err(Error::no_public_ip(self.endpoints.clone()))
    }
}
