//! Record reconciliation
//!
//! The Reconciler drives one pass of "make the provider match the resolved
//! address":
//! - Resolve the zone for the target name
//! - List existing records of the resolved kind
//! - Decide per record, then create, update, or skip
//! - Or, on the delete path, remove every listed record unconditionally
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ PublicIpResolver │─── ResolvedAddress ───┐
//! └──────────────────┘                       │
//!                                            ▼
//!                                   ┌────────────────┐
//!                                   │   Reconciler   │
//!                                   └────────────────┘
//!                                            │
//!                     ┌──────────────────────┼──────────────────────┐
//!                     │                      │                      │
//!                     ▼                      ▼                      ▼
//!             ┌──────────────┐      ┌──────────────┐      ┌──────────────┐
//!             │ zone helpers │      │   decide()   │      │ DnsProvider  │
//!             │ (query)      │      │ (pure)       │      │ (mutate)     │
//!             └──────────────┘      └──────────────┘      └──────────────┘
//! ```
//!
//! ## Failure model
//!
//! Strictly fail-fast: the first provider error aborts the pass with no
//! retry and no rollback. Actions already applied stay applied; each action
//! is logged as it happens so a partial pass is visible in the logs even
//! though the returned report is lost.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::decision::{decide, ChangeDecision};
use crate::record::{ProviderRecord, RecordKind, ResolvedAddress, Zone};
use crate::traits::DnsProvider;
use crate::zone::{list_records, resolve_zone};
use crate::Result;

/// One applied (or skipped) action in a reconciliation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordAction {
    /// A record was created at the target name
    Created {
        /// Fully qualified record name
        name: String,
        /// Record kind written
        kind: RecordKind,
        /// The IP literal written
        content: String,
    },
    /// An existing record's content was overwritten
    Updated {
        /// Provider-assigned record ID
        record_id: String,
        /// Fully qualified record name
        name: String,
        /// Content before the update
        previous_content: String,
        /// Content after the update
        content: String,
    },
    /// An existing record was left untouched
    Skipped {
        /// Provider-assigned record ID
        record_id: String,
        /// Why the record was skipped
        decision: ChangeDecision,
    },
    /// An existing record was deleted
    Deleted {
        /// Provider-assigned record ID
        record_id: String,
        /// Content the record carried when deleted
        content: String,
    },
}

impl fmt::Display for RecordAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordAction::Created {
                name,
                kind,
                content,
            } => {
                write!(f, "created {kind} record {name} -> {content}")
            }
            RecordAction::Updated {
                record_id,
                name,
                previous_content,
                content,
            } => {
                write!(
                    f,
                    "updated record {record_id} ({name}): {previous_content} -> {content}"
                )
            }
            RecordAction::Skipped {
                record_id,
                decision,
            } => {
                write!(f, "skipped record {record_id}: {}", decision.message)
            }
            RecordAction::Deleted { record_id, content } => {
                write!(f, "deleted record {record_id} ({content})")
            }
        }
    }
}

/// One-shot record reconciler
///
/// Owns the provider client and the mutation policy. Construct once per run;
/// the reconciler holds no state between passes.
///
/// ## Dry-run
///
/// With `dry_run` set, read-side queries still hit the provider but every
/// create, update, and delete is logged and reported without being sent.
pub struct Reconciler {
    /// DNS provider the pass reads from and writes to
    provider: Box<dyn DnsProvider>,

    /// Skip mutating calls, report what would have been done
    dry_run: bool,
}

impl Reconciler {
    /// Create a reconciler over a provider client
    pub fn new(provider: Box<dyn DnsProvider>, dry_run: bool) -> Self {
        Self { provider, dry_run }
    }

    /// Ensure one record of the resolved kind carries the resolved address
    ///
    /// Resolves the zone from `fqdn`, lists records of the resolved kind at
    /// the target name (`record_name` when given, else `fqdn`), then
    /// creates, updates, or skips per record.
    ///
    /// # Errors
    ///
    /// Zone resolution, listing, and every mutating call propagate provider
    /// errors unchanged; the pass stops at the first failure.
    pub async fn sync(
        &self,
        resolved: &ResolvedAddress,
        fqdn: &str,
        record_name: Option<&str>,
    ) -> Result<Vec<RecordAction>> {
        let name = record_name.unwrap_or(fqdn);
        info!(
            provider = self.provider.provider_name(),
            name = %name,
            address = %resolved.address,
            kind = %resolved.kind,
            dry_run = self.dry_run,
            "starting sync pass"
        );

        let zone = resolve_zone(self.provider.as_ref(), fqdn).await?;
        let existing = list_records(self.provider.as_ref(), &zone, name, resolved.kind).await?;

        self.reconcile(resolved, name, &zone, existing).await
    }

    /// Apply the create/update/skip workflow against already-listed records
    ///
    /// Exposed separately so embedders holding their own record listings can
    /// reuse the workflow; [`Reconciler::sync`] is this plus the zone and
    /// record queries.
    pub async fn reconcile(
        &self,
        resolved: &ResolvedAddress,
        name: &str,
        zone: &Zone,
        existing: Vec<ProviderRecord>,
    ) -> Result<Vec<RecordAction>> {
        let mut actions = Vec::new();

        if existing.is_empty() {
            actions.push(self.create(resolved, name, zone).await?);
            return Ok(actions);
        }

        for record in &existing {
            let decision = decide(resolved, &record.content, &record.record_type);
            if decision.update_required {
                actions.push(self.update(resolved, zone, record).await?);
            } else {
                debug!(
                    record_id = %record.id,
                    status = %decision.status,
                    "leaving record untouched"
                );
                actions.push(RecordAction::Skipped {
                    record_id: record.id.clone(),
                    decision,
                });
            }
        }

        Ok(actions)
    }

    /// Delete every record of the resolved kind at the target name
    ///
    /// No decision logic is involved: every record the provider lists for
    /// (zone, name, kind) is removed, including records this tool never
    /// created. Each record is named in a warn-level log line before the
    /// delete call goes out.
    ///
    /// # Errors
    ///
    /// Fail-fast like the sync path; records deleted before a failure stay
    /// deleted.
    pub async fn delete(
        &self,
        resolved: &ResolvedAddress,
        fqdn: &str,
        record_name: Option<&str>,
    ) -> Result<Vec<RecordAction>> {
        let name = record_name.unwrap_or(fqdn);
        info!(
            provider = self.provider.provider_name(),
            name = %name,
            kind = %resolved.kind,
            dry_run = self.dry_run,
            "starting delete pass"
        );

        let zone = resolve_zone(self.provider.as_ref(), fqdn).await?;
        let existing = list_records(self.provider.as_ref(), &zone, name, resolved.kind).await?;

        if existing.is_empty() {
            info!(name = %name, kind = %resolved.kind, "no records to delete");
            return Ok(Vec::new());
        }

        let mut actions = Vec::new();
        for record in &existing {
            warn!(
                record_id = %record.id,
                name = %record.name,
                content = %record.content,
                "deleting record regardless of origin"
            );
            if self.dry_run {
                info!(record_id = %record.id, "dry-run: would delete record");
            } else {
                self.provider.delete_record(&zone, &record.id).await?;
            }
            actions.push(RecordAction::Deleted {
                record_id: record.id.clone(),
                content: record.content.clone(),
            });
        }

        Ok(actions)
    }

    async fn create(
        &self,
        resolved: &ResolvedAddress,
        name: &str,
        zone: &Zone,
    ) -> Result<RecordAction> {
        if self.dry_run {
            info!(
                name = %name,
                kind = %resolved.kind,
                content = %resolved.address,
                "dry-run: would create record"
            );
        } else {
            let created = self
                .provider
                .create_record(zone, name, resolved.kind, &resolved.address)
                .await?;
            info!(
                record_id = %created.id,
                name = %name,
                content = %resolved.address,
                "created record"
            );
        }

        Ok(RecordAction::Created {
            name: name.to_string(),
            kind: resolved.kind,
            content: resolved.address.clone(),
        })
    }

    async fn update(
        &self,
        resolved: &ResolvedAddress,
        zone: &Zone,
        record: &ProviderRecord,
    ) -> Result<RecordAction> {
        if self.dry_run {
            info!(
                record_id = %record.id,
                previous = %record.content,
                content = %resolved.address,
                "dry-run: would update record"
            );
        } else {
            self.provider
                .update_record(zone, record, &resolved.address)
                .await?;
            info!(
                record_id = %record.id,
                previous = %record.content,
                content = %resolved.address,
                "updated record"
            );
        }

        Ok(RecordAction::Updated {
            record_id: record.id.clone(),
            name: record.name.clone(),
            previous_content: record.content.clone(),
            content: resolved.address.clone(),
        })
    }
}
