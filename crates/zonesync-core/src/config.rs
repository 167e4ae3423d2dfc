//! Configuration types for the zonesync system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// IP-echo endpoints queried when none are configured
pub const DEFAULT_ENDPOINTS: [&str; 2] = ["https://api.ipify.org/", "https://ipv4.icanhazip.com/"];

/// Default endpoint list as owned strings, for serde defaults and CLI wiring
pub fn default_endpoints() -> Vec<String> {
    DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect()
}

/// Configuration for one reconciliation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// IP-echo endpoints, queried in order
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,

    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Fully qualified name the zone is derived from
    pub fqdn: String,

    /// Target record name, when different from `fqdn`
    #[serde(default)]
    pub record_name: Option<String>,

    /// Report mutations without sending them
    #[serde(default)]
    pub dry_run: bool,
}

impl SyncConfig {
    /// Create a configuration for a provider and target name, with default
    /// endpoints
    pub fn new(provider: ProviderConfig, fqdn: impl Into<String>) -> Self {
        Self {
            endpoints: default_endpoints(),
            provider,
            fqdn: fqdn.into(),
            record_name: None,
            dry_run: false,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.endpoints.is_empty() {
            return Err(crate::Error::config("No IP-echo endpoints configured"));
        }

        for endpoint in &self.endpoints {
            if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
                return Err(crate::Error::config(format!(
                    "IP-echo endpoint must use HTTP or HTTPS scheme: {endpoint}"
                )));
            }
        }

        validate_fqdn(&self.fqdn)?;
        if let Some(ref name) = self.record_name {
            validate_fqdn(name)?;
        }

        self.provider.validate()?;

        Ok(())
    }

    /// Target record name: the override when set, otherwise the fqdn
    pub fn target_name(&self) -> &str {
        self.record_name.as_deref().unwrap_or(&self.fqdn)
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Cloudflare provider
    Cloudflare {
        /// API token (bearer auth), or global API key when `email` is set
        api_token: String,
        /// Account email, switches authentication to the global-key scheme
        #[serde(default)]
        email: Option<String>,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Cloudflare { api_token, email } => {
                if api_token.is_empty() {
                    return Err(crate::Error::config("Cloudflare API token cannot be empty"));
                }
                if let Some(email) = email
                    && !email.contains('@')
                {
                    return Err(crate::Error::config(format!(
                        "Cloudflare account email is not an email address: {email}"
                    )));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Cloudflare { .. } => "cloudflare",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Cloudflare {
            api_token: String::new(),
            email: None,
        }
    }
}

/// Validate that a string is a valid domain name
///
/// Basic DNS domain name validation per RFC 1035. Not comprehensive but
/// catches common errors.
pub fn validate_fqdn(domain: &str) -> Result<(), crate::Error> {
    if domain.is_empty() {
        return Err(crate::Error::config("Domain name cannot be empty"));
    }

    // Total length limit (RFC 1035: 253 chars max)
    if domain.len() > 253 {
        return Err(crate::Error::config(format!(
            "Domain name too long: {} chars (max 253). Got: {domain}",
            domain.len()
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Domain name has empty label: '{domain}'"
            )));
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Domain label too long: {} chars (max 63). Label: '{label}'",
                label.len()
            )));
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(crate::Error::config(format!(
                "Domain label contains invalid characters. Label: '{label}'. \
                Valid: alphanumeric and hyphen only."
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Domain label cannot start or end with hyphen. Label: '{label}'"
            )));
        }
    }

    Ok(())
}
