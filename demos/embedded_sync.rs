//! Minimal embedding example for zonesync-core
//!
//! This example demonstrates using zonesync-core as a library in a custom
//! application: the resolver and reconciler run against in-process
//! components, so no network access is involved.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use zonesync_core::traits::{DnsProvider, IpEchoClient};
use zonesync_core::{
    ProviderRecord, PublicIpResolver, Reconciler, RecordKind, Result, Zone,
};

/// Echo client answering from memory instead of the network
struct EmbeddedEcho {
    body: Arc<Mutex<String>>,
}

impl EmbeddedEcho {
    /// Returns the client plus a handle for changing the echoed body later
    fn new(initial: &str) -> (Self, Arc<Mutex<String>>) {
        let body = Arc::new(Mutex::new(initial.to_string()));
        (
            Self {
                body: Arc::clone(&body),
            },
            body,
        )
    }
}

#[async_trait::async_trait]
impl IpEchoClient for EmbeddedEcho {
    async fn get_body(&self, _url: &str) -> Result<String> {
        Ok(self.body.lock().unwrap().clone())
    }
}

/// DNS provider over an in-memory record table
struct EmbeddedProvider {
    zone: Zone,
    records: Arc<Mutex<Vec<ProviderRecord>>>,
    next_id: AtomicUsize,
}

impl EmbeddedProvider {
    fn new(zone_name: &str) -> Self {
        Self {
            zone: Zone {
                id: "demo-zone".to_string(),
                name: zone_name.to_string(),
            },
            records: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicUsize::new(1),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for EmbeddedProvider {
    async fn list_zones(&self, name: &str) -> Result<Vec<Zone>> {
        if name == self.zone.name {
            Ok(vec![self.zone.clone()])
        } else {
            Ok(Vec::new())
        }
    }

    async fn list_records(
        &self,
        _zone: &Zone,
        name: &str,
        kind: RecordKind,
    ) -> Result<Vec<ProviderRecord>> {
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
        let record = ProviderRecord {
            id: format!("demo-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
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
        let mut records = self.records.lock().unwrap();
        let stored = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .expect("record listed but missing on update");
        stored.content = content.to_string();
        Ok(stored.clone())
    }

    async fn delete_record(&self, _zone: &Zone, record_id: &str) -> Result<()> {
        self.records.lock().unwrap().retain(|r| r.id != record_id);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "embedded"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Embedded zonesync-core Example ===\n");

    let fqdn = "vpn.example.com";

    // Create custom components
    let (echo, echo_body) = EmbeddedEcho::new("203.0.113.7\n");
    let resolver = PublicIpResolver::single(Box::new(echo), "https://echo.internal/");
    let reconciler = Reconciler::new(Box::new(EmbeddedProvider::new("example.com")), false);

    // First pass: nothing exists yet, so a record is created
    println!("1. First sync pass (record does not exist yet):");
    let resolved = resolver.resolve().await?;
    for action in reconciler.sync(&resolved, fqdn, None).await? {
        println!("   {action}");
    }

    // Second pass: the record already carries the address
    println!("\n2. Second sync pass (nothing changed):");
    let resolved = resolver.resolve().await?;
    for action in reconciler.sync(&resolved, fqdn, None).await? {
        println!("   {action}");
    }

    // The public IP moves; the next pass updates in place
    println!("\n3. Public IP changed, third sync pass:");
    *echo_body.lock().unwrap() = "198.51.100.42\n".to_string();
    let resolved = resolver.resolve().await?;
    for action in reconciler.sync(&resolved, fqdn, None).await? {
        println!("   {action}");
    }

    // Tear the record down again
    println!("\n4. Delete pass:");
    for action in reconciler.delete(&resolved, fqdn, None).await? {
        println!("   {action}");
    }

    println!("\n=== Embedding Successful ===");
    println!("Key Points:");
    println!("- Resolver and reconciler are plain library types");
    println!("- Both collaborators are custom (no zonesync defaults)");
    println!("- No global state, no network access");

    Ok(())
}
