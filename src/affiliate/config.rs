use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::collation::KeyOrdering;
use crate::utils::{get_env_with_prefix, parse_env_with_prefix};

/// Travelpayouts affiliate configuration
///
/// Credentials are optional here; requests fail with a precondition error
/// when they are missing, so the rest of the service can start without them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AffiliateConfig {
    /// Partner API token. Never serialized.
    #[serde(skip)]
    pub token: Option<SecretString>,

    /// Affiliate marker attached to search requests
    #[serde(default)]
    pub marker: Option<String>,

    /// Host the requests are made on behalf of (`x-real-host`)
    #[serde(default)]
    pub real_host: String,

    /// Partner API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Key ordering used when signing
    #[serde(default)]
    pub key_ordering: KeyOrdering,
}

impl Default for AffiliateConfig {
    fn default() -> Self {
        Self {
            token: None,
            marker: None,
            real_host: String::new(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            key_ordering: KeyOrdering::default(),
        }
    }
}

impl AffiliateConfig {
    /// Load affiliate configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(token) = get_env_with_prefix("TRAVELPAYOUTS_TOKEN") {
            config.token = Some(SecretString::from(token));
        }
        if let Some(marker) = get_env_with_prefix("TRAVELPAYOUTS_MARKER") {
            config.marker = Some(marker);
        }
        if let Some(real_host) = get_env_with_prefix("TRAVELPAYOUTS_REAL_HOST") {
            config.real_host = real_host;
        }
        if let Some(base_url) = get_env_with_prefix("TRAVELPAYOUTS_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(seconds) = parse_env_with_prefix("TRAVELPAYOUTS_TIMEOUT_SECONDS") {
            config.timeout_seconds = seconds;
        }
        if let Some(ordering) = get_env_with_prefix("TRAVELPAYOUTS_KEY_ORDERING") {
            match ordering.trim().to_ascii_lowercase().as_str() {
                "collated" => config.key_ordering = KeyOrdering::Collated,
                "bytewise" => config.key_ordering = KeyOrdering::Bytewise,
                other => tracing::warn!(value = %other, "unknown key ordering, keeping default"),
            }
        }

        config
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    pub fn with_real_host(mut self, real_host: impl Into<String>) -> Self {
        self.real_host = real_host.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_key_ordering(mut self, ordering: KeyOrdering) -> Self {
        self.key_ordering = ordering;
        self
    }

    /// Get the request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_base_url() -> String {
    "https://api.travelpayouts.com".to_string()
}

fn default_timeout_seconds() -> u64 {
    15
}
