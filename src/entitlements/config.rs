use serde::{Deserialize, Serialize};

use super::evaluator::DEFAULT_FREE_TRIP_LIMIT;
use crate::utils::parse_env_with_prefix;

/// Entitlement configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntitlementsConfig {
    /// Free trip limit for non-pro accounts without a per-user override
    #[serde(default = "default_free_trip_limit")]
    pub default_free_trip_limit: u32,
}

impl Default for EntitlementsConfig {
    fn default() -> Self {
        Self {
            default_free_trip_limit: default_free_trip_limit(),
        }
    }
}

impl EntitlementsConfig {
    /// Load entitlement configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(limit) = parse_env_with_prefix("FREE_TRIP_LIMIT") {
            config.default_free_trip_limit = limit;
        }

        config
    }

    pub fn with_default_free_trip_limit(mut self, limit: u32) -> Self {
        self.default_free_trip_limit = limit;
        self
    }
}

fn default_free_trip_limit() -> u32 {
    DEFAULT_FREE_TRIP_LIMIT
}
