use serde::{Deserialize, Serialize};

use crate::affiliate::AffiliateConfig;
use crate::database::DatabaseConfig;
use crate::entitlements::EntitlementsConfig;
use crate::error::TripcastError;
use crate::utils::get_env_with_prefix;

/// Main configuration for a Tripcast service
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub entitlements: EntitlementsConfig,
    #[serde(default)]
    pub affiliate: AffiliateConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Builder for Config with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    pub fn with_entitlements(mut self, entitlements: EntitlementsConfig) -> Self {
        self.config.entitlements = entitlements;
        self
    }

    /// Set the trip limit applied to free accounts without a stored limit
    pub fn with_default_free_trip_limit(mut self, limit: u32) -> Self {
        self.config.entitlements.default_free_trip_limit = limit;
        self
    }

    pub fn with_affiliate(mut self, affiliate: AffiliateConfig) -> Self {
        self.config.affiliate = affiliate;
        self
    }

    pub fn with_database(mut self, database: DatabaseConfig) -> Self {
        self.config.database = database;
        self
    }

    /// Load configuration from environment variables with TRIPCAST_ prefix
    pub fn from_env(mut self) -> Self {
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.trim().parse().unwrap_or(false);
        }

        self.config.entitlements = EntitlementsConfig::from_env();
        self.config.affiliate = AffiliateConfig::from_env();
        self.config.database = DatabaseConfig::from_env();

        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns an error if the log level is unknown or the default free
    /// trip limit is zero.
    pub fn build(self) -> crate::error::Result<Config> {
        if !VALID_LOG_LEVELS.contains(&self.config.logging.level.to_lowercase().as_str()) {
            return Err(TripcastError::bad_request(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.config.logging.level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        if self.config.entitlements.default_free_trip_limit == 0 {
            return Err(TripcastError::configuration(
                "Default free trip limit must be greater than 0",
            ));
        }

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
