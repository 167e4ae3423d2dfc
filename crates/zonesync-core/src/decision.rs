//! Change decision engine
//!
//! [`decide`] is the single pure choke point between "what the provider has"
//! and "what we do about it". It never performs I/O and never mutates
//! anything; the reconciler owns all side effects.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::ResolvedAddress;

/// Classification of a (resolved address, existing record) comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionStatus {
    /// No record of the resolved kind exists at the target name
    ///
    /// Never produced by [`decide`]: the reconciler creates directly when
    /// the provider returns no candidate records, and records the action
    /// under this status.
    Create,
    /// Record exists with matching type but different content
    Update,
    /// Record already carries the resolved address
    NoUpdateNeeded,
    /// The resolved kind is outside the managed A/AAAA domain
    ///
    /// Unproducible by [`decide`] since [`crate::RecordKind`] is a closed
    /// enum; retained so consumers can match exhaustively on everything a
    /// decision report may carry.
    InvalidType,
    /// Existing record's type differs from the resolved kind
    TypeMismatch,
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DecisionStatus::Create => "create",
            DecisionStatus::Update => "update",
            DecisionStatus::NoUpdateNeeded => "no-update-needed",
            DecisionStatus::InvalidType => "invalid-type",
            DecisionStatus::TypeMismatch => "type-mismatch",
        };
        f.write_str(label)
    }
}

/// Outcome of comparing one resolved address against one existing record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDecision {
    /// What the comparison concluded
    pub status: DecisionStatus,
    /// Human-readable explanation, suitable for logs and reports
    pub message: String,
    /// Whether the reconciler must write to the provider
    pub update_required: bool,
}

/// Compare a resolved address against an existing record's content and type
///
/// Rules apply in priority order; the first match wins:
///
/// 1. existing type differs from the resolved kind's label: `TypeMismatch`,
///    the record is left for an operator to delete and recreate
/// 2. content already equals the resolved address: `NoUpdateNeeded`
/// 3. otherwise: `Update`
///
/// Exactly the decisions with `update_required == true` lead to provider
/// writes.
pub fn decide(
    resolved: &ResolvedAddress,
    existing_content: &str,
    existing_type: &str,
) -> ChangeDecision {
    let kind = resolved.kind.as_str();

    if existing_type != kind {
        return ChangeDecision {
            status: DecisionStatus::TypeMismatch,
            message: format!(
                "existing record type {existing_type} does not match resolved {kind} address {}",
                resolved.address
            ),
            update_required: false,
        };
    }

    if existing_content == resolved.address {
        return ChangeDecision {
            status: DecisionStatus::NoUpdateNeeded,
            message: format!("record already set to {}", resolved.address),
            update_required: false,
        };
    }

    ChangeDecision {
        status: DecisionStatus::Update,
        message: format!(
            "record content {existing_content} differs from resolved {}",
            resolved.address
        ),
        update_required: true,
    }
}
