// # DNS Provider Trait
//
// Defines the interface for querying and mutating DNS records via provider
// APIs.
//
// ## Implementations
//
// - Cloudflare: `zonesync-provider-cloudflare` crate
// - Future: Route53, DigitalOcean, GoDaddy, etc.
//
// ## Usage
//
// ```rust,ignore
// use zonesync_core::{DnsProvider, RecordKind};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider: Box<dyn DnsProvider> = /* provider implementation */;
//
//     let zones = provider.list_zones("example.com").await?;
//     let records = provider
//         .list_records(&zones[0], "host.example.com", RecordKind::A)
//         .await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::record::{ProviderRecord, RecordKind, Zone};

/// Trait for DNS provider implementations
///
/// This trait defines the interface for zone lookup and record CRUD.
/// Implementations must handle the specifics of each provider's API.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Trust Level: Untrusted
///
/// DNS providers are **untrusted** components with strict limitations:
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Parse provider-specific responses into the shared record model
/// - ✅ Return success or failure (the caller decides what happens next)
///
/// ## Forbidden Capabilities
/// - ❌ Implement retry logic or backoff (a failed call fails the run)
/// - ❌ Decide whether an update is needed (owned by the decision engine)
/// - ❌ Filter or reorder query results beyond what the API was asked for
/// - ❌ Cache records between calls (records are provider-owned state)
/// - ❌ Perform any I/O other than API calls to their endpoints
///
/// ## Rationale
///
/// Providers are external integrations that should be:
/// - **Isolated**: No knowledge of other providers or reconciler policy
/// - **Stateless**: No persistent state between requests
/// - **Single-shot**: One API call per method invocation
///
/// The reconciler deliberately has no retry layer; a provider that retries
/// internally would hide failures the operator needs to see.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List zones matching an exact zone name
    ///
    /// # Parameters
    ///
    /// - `name`: The zone name to match (a registrable domain, e.g.
    ///   "example.com")
    ///
    /// # Returns
    ///
    /// All zones the account can see under exactly that name. Usually zero
    /// or one; the caller treats "zero" as an error, not this method.
    async fn list_zones(&self, name: &str) -> Result<Vec<Zone>, crate::Error>;

    /// List records in a zone matching an exact name and kind
    ///
    /// # Parameters
    ///
    /// - `zone`: The zone to query
    /// - `name`: Fully qualified record name
    /// - `kind`: Record kind to filter on, applied provider-side
    ///
    /// # Returns
    ///
    /// Matching records in provider order. The caller relies on that order
    /// being stable for deterministic reporting.
    async fn list_records(
        &self,
        zone: &Zone,
        name: &str,
        kind: RecordKind,
    ) -> Result<Vec<ProviderRecord>, crate::Error>;

    /// Create a new address record
    ///
    /// # Parameters
    ///
    /// - `zone`: The zone to create in
    /// - `name`: Fully qualified record name
    /// - `kind`: Record kind ("A" or "AAAA")
    /// - `content`: The IP literal
    ///
    /// # Returns
    ///
    /// The created record as the provider reports it back.
    async fn create_record(
        &self,
        zone: &Zone,
        name: &str,
        kind: RecordKind,
        content: &str,
    ) -> Result<ProviderRecord, crate::Error>;

    /// Overwrite an existing record's content
    ///
    /// The record's name and type are resent unchanged; `proxied`, `ttl`,
    /// and any provider-specific fields carried in `record.extra` must be
    /// preserved by the implementation.
    ///
    /// # Parameters
    ///
    /// - `zone`: The zone containing the record
    /// - `record`: The existing record, as previously listed
    /// - `content`: The new IP literal
    async fn update_record(
        &self,
        zone: &Zone,
        record: &ProviderRecord,
        content: &str,
    ) -> Result<ProviderRecord, crate::Error>;

    /// Delete a record by provider ID
    ///
    /// # Parameters
    ///
    /// - `zone`: The zone containing the record
    /// - `record_id`: Provider-assigned record ID
    async fn delete_record(&self, zone: &Zone, record_id: &str) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the provider (e.g., "cloudflare")
    fn provider_name(&self) -> &'static str;
}

impl std::fmt::Debug for dyn DnsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsProvider")
            .field("provider", &self.provider_name())
            .finish_non_exhaustive()
    }
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this provider
    ///
    /// # Returns
    ///
    /// A boxed DnsProvider trait object
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
