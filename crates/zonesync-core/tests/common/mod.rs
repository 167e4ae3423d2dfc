//! Test doubles and common utilities for reconciliation contract tests
//!
//! This module provides a stateful in-memory provider double with call
//! counters, payload recording, and failure injection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use zonesync_core::error::{Error, Result};
use zonesync_core::record::{ProviderRecord, RecordKind, Zone};
use zonesync_core::traits::DnsProvider;

/// A mock DnsProvider backed by an in-memory record store
///
/// Mutating calls change the store, so a second pass over the same provider
/// sees the first pass's writes. Counters and recorded payloads are shared
/// across [`MockProvider::sharing_counters_with`] clones so tests keep their
/// handles after boxing one clone into the reconciler.
pub struct MockProvider {
    /// Provider name reported to callers
    pub name: &'static str,
    zones: Vec<Zone>,
    records: Arc<Mutex<Vec<ProviderRecord>>>,
    next_id: Arc<AtomicUsize>,
    list_zones_calls: Arc<AtomicUsize>,
    list_records_calls: Arc<AtomicUsize>,
    create_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
    /// (name, kind label) pairs passed to list_records
    list_queries: Arc<Mutex<Vec<(String, String)>>>,
    /// (existing record as passed in, new content) pairs passed to update_record
    update_payloads: Arc<Mutex<Vec<(ProviderRecord, String)>>>,
    deleted_ids: Arc<Mutex<Vec<String>>>,
    fail_update_for: Arc<Mutex<Option<String>>>,
    fail_delete_for: Arc<Mutex<Option<String>>>,
}

impl MockProvider {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            zones: Vec::new(),
            records: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicUsize::new(1)),
            list_zones_calls: Arc::new(AtomicUsize::new(0)),
            list_records_calls: Arc::new(AtomicUsize::new(0)),
            create_calls: Arc::new(AtomicUsize::new(0)),
            update_calls: Arc::new(AtomicUsize::new(0)),
            delete_calls: Arc::new(AtomicUsize::new(0)),
            list_queries: Arc::new(Mutex::new(Vec::new())),
            update_payloads: Arc::new(Mutex::new(Vec::new())),
            deleted_ids: Arc::new(Mutex::new(Vec::new())),
            fail_update_for: Arc::new(Mutex::new(None)),
            fail_delete_for: Arc::new(Mutex::new(None)),
        }
    }

    /// Add a zone the provider will report for `list_zones(name)`
    pub fn with_zone(mut self, id: &str, name: &str) -> Self {
        self.zones.push(Zone {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Seed the record store
    pub fn with_record(self, record: ProviderRecord) -> Self {
        self.records.lock().unwrap().push(record);
        self
    }

    /// Make update_record fail for one record ID
    pub fn failing_update_for(self, record_id: &str) -> Self {
        *self.fail_update_for.lock().unwrap() = Some(record_id.to_string());
        self
    }

    /// Make delete_record fail for one record ID
    pub fn failing_delete_for(self, record_id: &str) -> Self {
        *self.fail_delete_for.lock().unwrap() = Some(record_id.to_string());
        self
    }

    /// Create a new MockProvider that shares state and counters with an
    /// existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            name: other.name,
            zones: other.zones.clone(),
            records: Arc::clone(&other.records),
            next_id: Arc::clone(&other.next_id),
            list_zones_calls: Arc::clone(&other.list_zones_calls),
            list_records_calls: Arc::clone(&other.list_records_calls),
            create_calls: Arc::clone(&other.create_calls),
            update_calls: Arc::clone(&other.update_calls),
            delete_calls: Arc::clone(&other.delete_calls),
            list_queries: Arc::clone(&other.list_queries),
            update_payloads: Arc::clone(&other.update_payloads),
            deleted_ids: Arc::clone(&other.deleted_ids),
            fail_update_for: Arc::clone(&other.fail_update_for),
            fail_delete_for: Arc::clone(&other.fail_delete_for),
        }
    }

    pub fn list_records_calls(&self) -> usize {
        self.list_records_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// (name, kind label) pairs passed to list_records, in call order
    pub fn list_queries(&self) -> Vec<(String, String)> {
        self.list_queries.lock().unwrap().clone()
    }

    /// (record, new content) pairs passed to update_record, in call order
    pub fn update_payloads(&self) -> Vec<(ProviderRecord, String)> {
        self.update_payloads.lock().unwrap().clone()
    }

    /// Record IDs passed to delete_record, in call order
    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted_ids.lock().unwrap().clone()
    }

    /// Snapshot of the current record store
    pub fn records(&self) -> Vec<ProviderRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockProvider {
    async fn list_zones(&self, name: &str) -> Result<Vec<Zone>> {
        self.list_zones_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .zones
            .iter()
            .filter(|z| z.name == name)
            .cloned()
            .collect())
    }

    async fn list_records(
        &self,
        _zone: &Zone,
        name: &str,
        kind: RecordKind,
    ) -> Result<Vec<ProviderRecord>> {
        self.list_records_calls.fetch_add(1, Ordering::SeqCst);
        self.list_queries
            .lock()
            .unwrap()
            .push((name.to_string(), kind.as_str().to_string()));
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name == name && r.record_type == kind.as_str())
            .cloned()
            .collect())
    }

    async fn create_record(
        &self,
        _zone: &Zone,
        name: &str,
        kind: RecordKind,
        content: &str,
    ) -> Result<ProviderRecord> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = ProviderRecord {
            id: format!("mock-{id}"),
            name: name.to_string(),
            record_type: kind.as_str().to_string(),
            content: content.to_string(),
            proxied: false,
            ttl: None,
            extra: serde_json::Value::Null,
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_record(
        &self,
        _zone: &Zone,
        record: &ProviderRecord,
        content: &str,
    ) -> Result<ProviderRecord> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.update_payloads
            .lock()
            .unwrap()
            .push((record.clone(), content.to_string()));

        if self.fail_update_for.lock().unwrap().as_deref() == Some(record.id.as_str()) {
            return Err(Error::provider(self.name, "injected update failure"));
        }

        let mut records = self.records.lock().unwrap();
        let stored = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| Error::record_not_found(record.id.clone()))?;
        stored.content = content.to_string();
        Ok(stored.clone())
    }

    async fn delete_record(&self, _zone: &Zone, record_id: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.deleted_ids.lock().unwrap().push(record_id.to_string());

        if self.fail_delete_for.lock().unwrap().as_deref() == Some(record_id) {
            return Err(Error::provider(self.name, "injected delete failure"));
        }

        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Err(Error::record_not_found(record_id.to_string()));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}

/// Helper to build a record row for seeding the mock store
pub fn record(id: &str, name: &str, record_type: &str, content: &str) -> ProviderRecord {
    ProviderRecord {
        id: id.to_string(),
        name: name.to_string(),
        record_type: record_type.to_string(),
        content: content.to_string(),
        proxied: false,
        ttl: None,
        extra: serde_json::Value::Null,
    }
}

/// Helper to build a proxied record with provider-specific extras
pub fn proxied_record(id: &str, name: &str, record_type: &str, content: &str) -> ProviderRecord {
    ProviderRecord {
        id: id.to_string(),
        name: name.to_string(),
        record_type: record_type.to_string(),
        content: content.to_string(),
        proxied: true,
        ttl: Some(120),
        extra: serde_json::json!({ "locked": false }),
    }
}
