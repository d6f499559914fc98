//! Tripcast - trip entitlements and affiliate request signing
//!
//! The building blocks behind Tripcast's trip planner: deciding what a user
//! is allowed to create, and talking to the Travelpayouts partner API.
//!
//! # Features
//!
//! - **Entitlements**: Pro detection and free-tier trip quotas
//! - **Affiliate**: MD5 request signing, partner headers and a flight search client
//! - **Database**: SeaORM-backed account store (`database` feature)
//! - **Testing**: In-memory account store (`test-helpers` feature)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tripcast::{ConfigBuilder, entitlements::EntitlementsManager};
//!
//! #[tokio::main]
//! async fn main() -> tripcast::Result<()> {
//!     let config = ConfigBuilder::new().from_env().build()?;
//!     tripcast::init_tracing_with_config(&config);
//!
//!     let db = tripcast::database::connect(&config.database).await?;
//!     let store = tripcast::entitlements::SeaOrmAccountStore::new(db);
//!     let manager = EntitlementsManager::with_config(store, &config.entitlements);
//!
//!     let entitlement = manager.get_entitlements("user-1").await?;
//!     println!("pro: {}", entitlement.is_pro);
//!     Ok(())
//! }
//! ```

pub mod affiliate;
mod config;
pub mod database;
pub mod entitlements;
mod error;
mod utils;

// Re-exports for public API
pub use affiliate::{
    AffiliateClient, AffiliateConfig, AffiliateError, RequestSigner, Signature, SignaturePayload,
};
pub use config::{Config, ConfigBuilder, LoggingConfig};
pub use database::DatabaseConfig;
pub use entitlements::{
    AccountStore, Entitlement, EntitlementError, EntitlementsConfig, EntitlementsManager,
    TripQuota, UserAccount,
};
pub use error::{ErrorResponse, Result, TripcastError};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "tripcast=debug")
/// - `TRIPCAST_LOG_JSON` (or `LOG_JSON`): Set to "true" for JSON formatted logs
///
/// # Example
///
/// ```rust,no_run
/// fn main() {
///     tripcast::init_tracing();
///     // ... rest of your service
/// }
/// ```
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json_logs_from_env() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Initialize tracing with a custom configuration
pub fn init_tracing_with_config(config: &Config) {
    let env_filter = EnvFilter::new(&config.logging.level);

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn json_logs_from_env() -> bool {
    utils::get_env_with_prefix("LOG_JSON")
        .map(|v| v.trim().parse::<bool>().unwrap_or(false))
        .unwrap_or(false)
}
