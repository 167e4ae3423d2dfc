//! Zone and record query helpers
//!
//! Bridges a fully qualified record name to the provider's zone and record
//! queries: extract the registrable domain, look the zone up by that exact
//! name, list candidate records.

use tracing::debug;

use crate::record::{ProviderRecord, RecordKind, Zone};
use crate::traits::DnsProvider;
use crate::{Error, Result};

/// Extract the registrable domain from a fully qualified record name
///
/// Uses a label heuristic rather than a public-suffix table: the last two
/// labels, or the last three when the second-to-last label is three
/// characters or fewer (covers `co.uk`, `com.au` style suffixes).
///
/// - `"sub.example.com"` -> `"example.com"`
/// - `"deep.nested.example.co.uk"` -> `"example.co.uk"`
/// - `"example.com"` -> `"example.com"`
///
/// # Errors
///
/// A name with fewer than two labels has no registrable domain and is a
/// configuration error.
pub fn registrable_domain(fqdn: &str) -> Result<String> {
    let labels: Vec<&str> = fqdn.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(Error::config(format!("invalid domain name: {fqdn}")));
    }

    let n = labels.len();
    let domain = if n >= 3 && labels[n - 2].len() <= 3 {
        format!("{}.{}.{}", labels[n - 3], labels[n - 2], labels[n - 1])
    } else {
        format!("{}.{}", labels[n - 2], labels[n - 1])
    };

    Ok(domain)
}

/// Resolve the zone containing a fully qualified record name
///
/// Queries the provider for zones named exactly the registrable domain of
/// `fqdn` and takes the first match.
///
/// # Errors
///
/// [`Error::ZoneNotFound`] when the provider reports no zone under that
/// name; provider and transport errors propagate unchanged.
pub async fn resolve_zone(provider: &dyn DnsProvider, fqdn: &str) -> Result<Zone> {
    let domain = registrable_domain(fqdn)?;
    debug!(domain = %domain, "looking up zone");

    let zones = provider.list_zones(&domain).await?;
    let zone = zones
        .into_iter()
        .next()
        .ok_or_else(|| Error::zone_not_found(domain))?;

    debug!(zone_id = %zone.id, zone_name = %zone.name, "resolved zone");
    Ok(zone)
}

/// List the records the reconciler will consider for a target name
///
/// A thin translation to the provider query: exact name, exact kind, no
/// client-side filtering on top.
pub async fn list_records(
    provider: &dyn DnsProvider,
    zone: &Zone,
    name: &str,
    kind: RecordKind,
) -> Result<Vec<ProviderRecord>> {
    let records = provider.list_records(zone, name, kind).await?;
    debug!(
        zone = %zone.name,
        name = %name,
        kind = %kind,
        count = records.len(),
        "listed candidate records"
    );
    Ok(records)
}
