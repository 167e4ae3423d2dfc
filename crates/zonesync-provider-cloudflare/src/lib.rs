// # Cloudflare DNS Provider
//
// This crate provides a Cloudflare DNS provider implementation for zonesync.
//
// ## Scope
//
// - ✅ One HTTP request per trait method call
// - ✅ Full error propagation to the caller (reconciler decides what happens)
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Specific error handling for HTTP status codes (401, 403, 404, 429, 5xx)
// - ✅ Token auth (bearer) and legacy global-key auth (email + key)
// - ✅ Both A and AAAA record support
// - ❌ NO retry logic (intentionally omitted - a failed call fails the run)
// - ❌ NO decision logic (intentionally omitted - owned by the decision engine)
// - ❌ NO caching (records are provider-owned state)
//
// ## Security Requirements
//
// - API credentials NEVER appear in logs or Debug output
// - Provider MUST fail fast if the token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...&type=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`
// - Delete DNS Record: DELETE `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use zonesync_core::config::ProviderConfig;
use zonesync_core::record::{ProviderRecord, RecordKind, Zone};
use zonesync_core::traits::{DnsProvider, DnsProviderFactory};
use zonesync_core::{Error, Result};

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Cloudflare authentication scheme
///
/// Token auth is the recommended mode. Global-key auth exists for accounts
/// still using the legacy email + API-key pair.
#[derive(Clone)]
pub enum CloudflareAuth {
    /// Scoped API token, sent as `Authorization: Bearer`
    Token(String),
    /// Legacy global API key, sent as `X-Auth-Email` / `X-Auth-Key`
    GlobalKey {
        /// Account email
        email: String,
        /// Global API key
        key: String,
    },
}

impl CloudflareAuth {
    /// Attach the credentials to a request
    fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            CloudflareAuth::Token(token) => builder.bearer_auth(token),
            CloudflareAuth::GlobalKey { email, key } => builder
                .header("X-Auth-Email", email)
                .header("X-Auth-Key", key),
        }
    }

    fn secret(&self) -> &str {
        match self {
            CloudflareAuth::Token(token) => token,
            CloudflareAuth::GlobalKey { key, .. } => key,
        }
    }
}

// Custom Debug implementation that hides the credential material
impl std::fmt::Debug for CloudflareAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloudflareAuth::Token(_) => f.debug_tuple("Token").field(&"<REDACTED>").finish(),
            CloudflareAuth::GlobalKey { email, .. } => f
                .debug_struct("GlobalKey")
                .field("email", email)
                .field("key", &"<REDACTED>")
                .finish(),
        }
    }
}

/// Standard Cloudflare v4 response envelope
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiErrorDto>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDto {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ZoneDto {
    id: String,
    name: String,
}

impl From<ZoneDto> for Zone {
    fn from(dto: ZoneDto) -> Self {
        Zone {
            id: dto.id,
            name: dto.name,
        }
    }
}

/// A DNS record as Cloudflare returns it
///
/// Fields beyond the shared record model (locked, zone_name, timestamps,
/// ...) are collected into `extra` so callers can see them; they are never
/// sent back on writes, which is how the API preserves them.
#[derive(Debug, Deserialize)]
struct DnsRecordDto {
    id: String,
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    content: String,
    #[serde(default)]
    proxied: Option<bool>,
    #[serde(default)]
    ttl: Option<u32>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl From<DnsRecordDto> for ProviderRecord {
    fn from(dto: DnsRecordDto) -> Self {
        let extra = if dto.extra.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::Value::Object(dto.extra)
        };
        ProviderRecord {
            id: dto.id,
            name: dto.name,
            record_type: dto.record_type,
            content: dto.content,
            proxied: dto.proxied.unwrap_or(false),
            ttl: dto.ttl,
            extra,
        }
    }
}

/// Write payload for create and update calls
#[derive(Debug, Serialize)]
struct WriteRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxied: Option<bool>,
}

impl<'a> WriteRecord<'a> {
    /// Payload for a brand new record; ttl and proxied are left to the
    /// provider's defaults
    fn create(name: &'a str, kind: RecordKind, content: &'a str) -> Self {
        Self {
            record_type: kind.as_str(),
            name,
            content,
            ttl: None,
            proxied: None,
        }
    }

    /// Payload that overwrites content while resending the listed record's
    /// name, type, ttl, and proxied flag unchanged
    fn replace(record: &'a ProviderRecord, content: &'a str) -> Self {
        Self {
            record_type: &record.record_type,
            name: &record.name,
            content,
            ttl: record.ttl,
            proxied: Some(record.proxied),
        }
    }
}

/// Map a non-success HTTP status to the shared error type
///
/// `not_found` supplies the 404 mapping since it depends on what was being
/// looked up (zone vs record).
fn error_for_status(status: reqwest::StatusCode, body: &str, not_found: Error) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "invalid Cloudflare credentials or insufficient permissions (status {status})"
        )),
        404 => not_found,
        429 => Error::rate_limited(format!("Cloudflare rate limit exceeded (status {status})")),
        500..=599 => Error::provider(
            "cloudflare",
            format!("server error (transient): {status} - {body}"),
        ),
        _ => Error::provider("cloudflare", format!("request failed: {status} - {body}")),
    }
}

/// Collapse the envelope's error list into one provider error
fn envelope_error(errors: &[ApiErrorDto], context: &str) -> Error {
    let detail = if errors.is_empty() {
        "unknown API error".to_string()
    } else {
        errors
            .iter()
            .map(|e| format!("{} (code {})", e.message, e.code))
            .collect::<Vec<_>>()
            .join("; ")
    };
    Error::provider("cloudflare", format!("{context}: {detail}"))
}

/// Cloudflare DNS provider
///
/// Isolated, stateless, single-shot: each trait method performs exactly one
/// API call and hands the outcome back to the caller.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the credentials.
pub struct CloudflareProvider {
    /// Authentication material
    /// ⚠️ NEVER log this value
    auth: CloudflareAuth,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("auth", &self.auth)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `auth`: Token or global-key credentials; tokens need Zone:Read and
    ///   DNS:Edit permissions
    ///
    /// # Errors
    ///
    /// Configuration error when the credential material is empty; transport
    /// error when the HTTP client cannot be constructed.
    pub fn new(auth: CloudflareAuth) -> Result<Self> {
        if auth.secret().is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { auth, client })
    }

    /// Send one request and unwrap the Cloudflare envelope around `T`
    async fn request<T>(
        &self,
        builder: reqwest::RequestBuilder,
        context: &str,
        not_found: impl FnOnce() -> Error,
    ) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .auth
            .apply(builder)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(error_for_status(status, &body, not_found()));
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| Error::provider("cloudflare", format!("failed to parse response: {e}")))?;

        if !envelope.success {
            return Err(envelope_error(&envelope.errors, context));
        }

        envelope
            .result
            .ok_or_else(|| Error::provider("cloudflare", format!("{context}: missing result")))
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// List zones matching an exact name
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones?name=example.com
    /// ```
    async fn list_zones(&self, name: &str) -> Result<Vec<Zone>> {
        tracing::debug!("Listing Cloudflare zones named: {}", name);

        let builder = self
            .client
            .get(format!("{CLOUDFLARE_API_BASE}/zones"))
            .query(&[("name", name)]);

        let zones: Vec<ZoneDto> = self
            .request(builder, "zone lookup", || Error::zone_not_found(name))
            .await?;

        Ok(zones.into_iter().map(Zone::from).collect())
    }

    /// List records in a zone matching an exact name and kind
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?name=example.com&type=A
    /// ```
    async fn list_records(
        &self,
        zone: &Zone,
        name: &str,
        kind: RecordKind,
    ) -> Result<Vec<ProviderRecord>> {
        tracing::debug!(
            "Listing Cloudflare records: {} (type: {}) in zone {}",
            name,
            kind,
            zone.id
        );

        let builder = self
            .client
            .get(format!(
                "{CLOUDFLARE_API_BASE}/zones/{}/dns_records",
                zone.id
            ))
            .query(&[("name", name), ("type", kind.as_str())]);

        let records: Vec<DnsRecordDto> = self
            .request(builder, "record listing", || {
                Error::record_not_found(format!("{name} (type: {kind})"))
            })
            .await?;

        Ok(records.into_iter().map(ProviderRecord::from).collect())
    }

    /// Create a new address record
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /zones/:zone_id/dns_records
    /// { "type": "A", "name": "example.com", "content": "1.2.3.4" }
    /// ```
    async fn create_record(
        &self,
        zone: &Zone,
        name: &str,
        kind: RecordKind,
        content: &str,
    ) -> Result<ProviderRecord> {
        tracing::info!(
            "Creating Cloudflare record: {} ({}) -> {} in zone {}",
            name,
            kind,
            content,
            zone.id
        );

        let payload = WriteRecord::create(name, kind, content);
        let builder = self
            .client
            .post(format!(
                "{CLOUDFLARE_API_BASE}/zones/{}/dns_records",
                zone.id
            ))
            .json(&payload);

        let created: DnsRecordDto = self
            .request(builder, "record creation", || {
                Error::zone_not_found(zone.name.clone())
            })
            .await?;

        Ok(created.into())
    }

    /// Overwrite an existing record's content
    ///
    /// Resends the listed name, type, ttl, and proxied flag so the update
    /// changes nothing but the content. Fields not in the payload are
    /// preserved server-side.
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// { "type": "A", "name": "example.com", "content": "1.2.3.4",
    ///   "ttl": 120, "proxied": true }
    /// ```
    async fn update_record(
        &self,
        zone: &Zone,
        record: &ProviderRecord,
        content: &str,
    ) -> Result<ProviderRecord> {
        tracing::info!(
            "Updating Cloudflare record {}: {} -> {} (was: {})",
            record.id,
            record.name,
            content,
            record.content
        );

        let payload = WriteRecord::replace(record, content);
        let builder = self
            .client
            .put(format!(
                "{CLOUDFLARE_API_BASE}/zones/{}/dns_records/{}",
                zone.id, record.id
            ))
            .json(&payload);

        let updated: DnsRecordDto = self
            .request(builder, "record update", || {
                Error::record_not_found(record.id.clone())
            })
            .await?;

        Ok(updated.into())
    }

    /// Delete a record by ID
    ///
    /// # API Call
    ///
    /// ```http
    /// DELETE /zones/:zone_id/dns_records/:record_id
    /// ```
    async fn delete_record(&self, zone: &Zone, record_id: &str) -> Result<()> {
        tracing::info!(
            "Deleting Cloudflare record {} in zone {}",
            record_id,
            zone.id
        );

        let builder = self.client.delete(format!(
            "{CLOUDFLARE_API_BASE}/zones/{}/dns_records/{}",
            zone.id, record_id
        ));

        let _: serde_json::Value = self
            .request(builder, "record deletion", || {
                Error::record_not_found(record_id.to_string())
            })
            .await?;

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}

/// Factory for creating Cloudflare providers
pub struct CloudflareFactory;

impl DnsProviderFactory for CloudflareFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::Cloudflare { api_token, email } => {
                if api_token.is_empty() {
                    return Err(Error::config("Cloudflare API token is required"));
                }

                let auth = match email {
                    Some(email) => CloudflareAuth::GlobalKey {
                        email: email.clone(),
                        key: api_token.clone(),
                    },
                    None => CloudflareAuth::Token(api_token.clone()),
                };

                Ok(Box::new(CloudflareProvider::new(auth)?))
            }
            _ => Err(Error::config("Invalid config for Cloudflare provider")),
        }
    }
}

/// Register the Cloudflare provider with a registry
///
/// This function should be called during initialization to make the
/// Cloudflare provider available.
///
/// # Example
///
/// ```rust
/// use zonesync_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// zonesync_provider_cloudflare::register(&registry);
/// assert!(registry.has_provider("cloudflare"));
/// ```
pub fn register(registry: &zonesync_core::ProviderRegistry) {
    registry.register_provider("cloudflare", Box::new(CloudflareFactory));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_creation() {
        let factory = CloudflareFactory;

        let config = ProviderConfig::Cloudflare {
            api_token: "test_token".to_string(),
            email: None,
        };

        let provider = factory.create(&config);
        assert!(provider.is_ok());
    }

    #[test]
    fn test_factory_missing_token() {
        let factory = CloudflareFactory;

        let config = ProviderConfig::Cloudflare {
            api_token: "".to_string(),
            email: None,
        };

        let provider = factory.create(&config);
        assert!(provider.is_err());
    }

    #[test]
    fn test_factory_rejects_foreign_config() {
        let factory = CloudflareFactory;

        let config = ProviderConfig::Custom {
            factory: "route53".to_string(),
            config: serde_json::json!({ "region": "us-east-1" }),
        };

        assert!(factory.create(&config).is_err());
    }

    #[test]
    fn test_factory_accepts_global_key_config() {
        let factory = CloudflareFactory;

        let config = ProviderConfig::Cloudflare {
            api_token: "global_key_material".to_string(),
            email: Some("admin@example.com".to_string()),
        };

        assert!(factory.create(&config).is_ok());
    }

    #[test]
    fn test_global_key_not_exposed_in_debug() {
        let provider = CloudflareProvider::new(CloudflareAuth::GlobalKey {
            email: "admin@example.com".to_string(),
            key: "global_key_material".to_string(),
        })
        .unwrap();

        let debug_str = format!("{:?}", provider);
        assert!(debug_str.contains("GlobalKey"));
        assert!(debug_str.contains("admin@example.com"));
        assert!(!debug_str.contains("global_key_material"));
    }

    #[test]
    fn test_register_adds_cloudflare() {
        let registry = zonesync_core::ProviderRegistry::new();
        register(&registry);
        assert!(registry.has_provider("cloudflare"));
    }

    #[test]
    fn test_api_token_not_exposed_in_debug() {
        let provider =
            CloudflareProvider::new(CloudflareAuth::Token("secret_token_12345".to_string()))
                .unwrap();

        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(!debug_str.contains("secret_token"));
        // The struct name should appear but not the token value
        assert!(debug_str.contains("CloudflareProvider"));
    }

    #[test]
    fn test_empty_token_is_config_error() {
        let err = CloudflareProvider::new(CloudflareAuth::Token(String::new())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_status_mapping() {
        let status = |code: u16| reqwest::StatusCode::from_u16(code).unwrap();
        let not_found = || Error::record_not_found("host.example.com");

        assert!(matches!(
            error_for_status(status(401), "", not_found()),
            Error::Authentication(_)
        ));
        assert!(matches!(
            error_for_status(status(403), "", not_found()),
            Error::Authentication(_)
        ));
        assert!(matches!(
            error_for_status(status(404), "", not_found()),
            Error::RecordNotFound(_)
        ));
        assert!(matches!(
            error_for_status(status(429), "", not_found()),
            Error::RateLimited(_)
        ));
        assert!(matches!(
            error_for_status(status(500), "boom", not_found()),
            Error::Provider { .. }
        ));
        assert!(matches!(
            error_for_status(status(418), "teapot", not_found()),
            Error::Provider { .. }
        ));
    }

    #[test]
    fn test_envelope_error_joins_messages() {
        let errors = vec![
            ApiErrorDto {
                code: 9103,
                message: "Unknown X-Auth-Key or X-Auth-Email".to_string(),
            },
            ApiErrorDto {
                code: 7003,
                message: "Could not route to /zones".to_string(),
            },
        ];
        let err = envelope_error(&errors, "zone lookup");
        let text = err.to_string();
        assert!(text.contains("9103"));
        assert!(text.contains("7003"));
        assert!(text.contains("zone lookup"));
    }

    #[test]
    fn test_zone_envelope_parsing() {
        let json = r#"{
            "success": true,
            "errors": [],
            "messages": [],
            "result": [
                { "id": "023e105f4ecef8ad9ca31a8372d0c353", "name": "example.com", "status": "active" }
            ]
        }"#;

        let envelope: ApiEnvelope<Vec<ZoneDto>> = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        let zones = envelope.result.unwrap();
        assert_eq!(zones[0].id, "023e105f4ecef8ad9ca31a8372d0c353");
        assert_eq!(zones[0].name, "example.com");
    }

    #[test]
    fn test_record_envelope_parsing_collects_extras() {
        let json = r#"{
            "success": true,
            "errors": [],
            "result": [{
                "id": "372e67954025e0ba6aaa6d586b9e0b59",
                "name": "host.example.com",
                "type": "A",
                "content": "198.51.100.4",
                "proxied": true,
                "ttl": 120,
                "locked": false,
                "zone_name": "example.com"
            }]
        }"#;

        let envelope: ApiEnvelope<Vec<DnsRecordDto>> = serde_json::from_str(json).unwrap();
        let record: ProviderRecord = envelope.result.unwrap().remove(0).into();

        assert_eq!(record.id, "372e67954025e0ba6aaa6d586b9e0b59");
        assert_eq!(record.record_type, "A");
        assert!(record.proxied);
        assert_eq!(record.ttl, Some(120));
        assert_eq!(record.extra["locked"], serde_json::json!(false));
        assert_eq!(record.extra["zone_name"], serde_json::json!("example.com"));
    }

    #[test]
    fn test_failed_envelope_reports_success_false() {
        let json = r#"{
            "success": false,
            "errors": [{ "code": 10000, "message": "Authentication error" }],
            "result": null
        }"#;

        let envelope: ApiEnvelope<Vec<ZoneDto>> = serde_json::from_str(json).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.errors[0].code, 10000);
        assert!(envelope.result.is_none());
    }

    #[test]
    fn test_create_payload_omits_provider_defaults() {
        let payload = WriteRecord::create("host.example.com", RecordKind::A, "203.0.113.7");
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["type"], "A");
        assert_eq!(json["name"], "host.example.com");
        assert_eq!(json["content"], "203.0.113.7");
        assert!(json.get("ttl").is_none());
        assert!(json.get("proxied").is_none());
    }

    #[test]
    fn test_replace_payload_preserves_listed_fields() {
        let record = ProviderRecord {
            id: "rec-1".to_string(),
            name: "host.example.com".to_string(),
            record_type: "A".to_string(),
            content: "198.51.100.4".to_string(),
            proxied: true,
            ttl: Some(120),
            extra: serde_json::Value::Null,
        };

        let payload = WriteRecord::replace(&record, "203.0.113.7");
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["type"], "A");
        assert_eq!(json["name"], "host.example.com");
        assert_eq!(json["content"], "203.0.113.7");
        assert_eq!(json["ttl"], 120);
        assert_eq!(json["proxied"], true);
    }
}
