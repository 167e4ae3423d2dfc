// # IP Echo Client Trait
//
// Defines the interface for fetching raw bodies from IP-echo endpoints.
//
// ## Implementations
//
// - reqwest-based: `zonesync-ip-http` crate
// - Test fakes: scripted bodies per endpoint
//
// ## Usage
//
// ```rust,ignore
// use zonesync_core::IpEchoClient;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let client: Box<dyn IpEchoClient> = /* client implementation */;
//     let body = client.get_body("https://api.ipify.org/").await?;
//     println!("echoed: {}", body.trim());
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for IP-echo HTTP clients
///
/// Implementations fetch a URL and hand back the body untouched. All
/// interpretation of the body (trimming, emptiness, v4/v6 classification)
/// belongs to the resolver.
///
/// # Trust Level: Untrusted
///
/// Echo clients are plain transports:
///
/// - ✅ One GET per call, to the URL they were given
/// - ❌ No retries, no fallback across URLs (the resolver owns endpoint
///   ordering)
/// - ❌ No body inspection or normalization
///
/// # Errors
///
/// A network failure or a non-success HTTP status is an error and must
/// surface as [`crate::Error::Transport`]. An empty body is **not** an
/// error; the resolver uses it to fall through to the next endpoint.
#[async_trait]
pub trait IpEchoClient: Send + Sync {
    /// Fetch one URL and return its body as text
    async fn get_body(&self, url: &str) -> Result<String, crate::Error>;
}
