//! Core traits for the zonesync system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpEchoClient`]: Fetch raw bodies from IP-echo endpoints
//! - [`DnsProvider`]: Query and mutate DNS records via provider APIs

pub mod dns_provider;
pub mod ip_echo;

pub use dns_provider::{DnsProvider, DnsProviderFactory};
pub use ip_echo::IpEchoClient;
