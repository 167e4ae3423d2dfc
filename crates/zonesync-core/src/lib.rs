// # zonesync-core
//
// Core library for one-shot dynamic-DNS reconciliation.
//
// ## Architecture Overview
//
// This library provides the core functionality for reconciling DNS records
// against the caller's current public IP:
// - **IpEchoClient**: Trait for fetching raw bodies from IP-echo endpoints
// - **DnsProvider**: Trait for querying and mutating records via provider APIs
// - **PublicIpResolver**: Walks an ordered endpoint list to a classified address
// - **decide()**: Pure comparison of a resolved address against a record
// - **Reconciler**: Orchestrates the create/update/skip and delete workflows
// - **ProviderRegistry**: Plugin-based registry for DNS providers
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **One-Shot**: Each run is a stateless reconciliation pass, nothing persists
// 3. **Plugin-Based**: Providers are registered dynamically, no hard-coded if-else
// 4. **Library-First**: All core functionality can be used as a library
// 5. **Fail-Fast**: Provider errors abort the pass, no retry and no rollback

pub mod config;
pub mod decision;
pub mod error;
pub mod reconcile;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod traits;
pub mod zone;

// Re-export core types for convenience
pub use config::{ProviderConfig, SyncConfig};
pub use decision::{decide, ChangeDecision, DecisionStatus};
pub use error::{Error, Result};
pub use reconcile::{RecordAction, Reconciler};
pub use record::{ProviderRecord, RecordKind, ResolvedAddress, Zone};
pub use registry::ProviderRegistry;
pub use resolver::PublicIpResolver;
pub use traits::{DnsProvider, DnsProviderFactory, IpEchoClient};
