//! Core data model: resolved addresses, provider records, zones
//!
//! These types are the vocabulary shared by the resolver, the decision
//! engine, and the reconciler. Records are owned by the provider and are
//! never cached between runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two address record kinds this system manages
///
/// The kind of a resolved IP and the type of an address record are drawn
/// from the same closed domain: `A`/IPv4 and `AAAA`/IPv6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// IPv4 address record
    A,
    /// IPv6 address record
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordKind {
    /// The provider-facing wire label for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::A => "A",
            RecordKind::Aaaa => "AAAA",
        }
    }

    /// Classify an IP literal by syntax
    ///
    /// A colon anywhere in the body means IPv6, otherwise IPv4. This is a
    /// syntactic heuristic, not address validation: the echo endpoints are
    /// trusted to return well-formed literals.
    pub fn classify(address: &str) -> Self {
        if address.contains(':') {
            RecordKind::Aaaa
        } else {
            RecordKind::A
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(RecordKind::A),
            "AAAA" => Ok(RecordKind::Aaaa),
            other => Err(crate::Error::config(format!(
                "unsupported record type: {other}"
            ))),
        }
    }
}

/// A public IP address resolved from an echo endpoint
///
/// Produced exactly once per run and passed read-only to every downstream
/// step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    /// The IP literal as returned by the endpoint, whitespace-trimmed
    pub address: String,
    /// Syntactic classification of `address`
    pub kind: RecordKind,
}

impl ResolvedAddress {
    /// Build a resolved address from a raw echo-endpoint body
    ///
    /// Trims surrounding whitespace and classifies the remainder. Returns
    /// `None` when the trimmed body is empty, which callers treat as "this
    /// endpoint had nothing to say".
    pub fn from_body(body: &str) -> Option<Self> {
        let address = body.trim();
        if address.is_empty() {
            return None;
        }
        Some(Self {
            address: address.to_string(),
            kind: RecordKind::classify(address),
        })
    }
}

impl fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.address, self.kind)
    }
}

/// A DNS record as reported by the provider
///
/// `record_type` stays a plain wire label rather than a [`RecordKind`]: the
/// provider may return types outside the managed domain (TXT, CNAME) and the
/// decision engine must be able to report those as mismatches instead of
/// failing to parse them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Provider-assigned record ID
    pub id: String,
    /// Fully qualified record name
    pub name: String,
    /// Wire record type label ("A", "AAAA", "TXT", ...)
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record content (an IP literal for address records)
    pub content: String,
    /// Whether the provider proxies traffic for this record
    #[serde(default)]
    pub proxied: bool,
    /// Time-to-live, when the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Any additional provider-specific fields, preserved across updates
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub extra: serde_json::Value,
}

/// A DNS zone resolved from the registrable domain of a target name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Provider-assigned zone ID
    pub id: String,
    /// Zone name (the registrable domain)
    pub name: String,
}
