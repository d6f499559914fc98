//! Trip quota entitlements.
//!
//! Decides whether a user is Pro and how many trips they may own on the free
//! tier. A user is Pro when they are an admin or a premium subscriber; Pro
//! users have no trip limit. Everyone else gets their per-account
//! `free_trip_limit`, or the configured default (5) when none is stored.
//!
//! Only trips whose `source_type` is NULL, `template` or `user_episode_trip`
//! count against the limit.
//!
//! # Example
//!
//! ```rust,ignore
//! use tripcast::entitlements::{EntitlementsManager, TripQuota};
//!
//! let manager = EntitlementsManager::with_config(store, &config.entitlements);
//!
//! // Snapshot for the client
//! let entitlement = manager.get_entitlements(&user_id).await?;
//!
//! // Gate trip creation
//! manager.require_trip_slot(&user_id).await?;
//! ```

pub mod config;
pub mod error;
pub mod evaluator;
pub mod quota;
#[cfg(feature = "database")]
pub mod sea_orm_store;
pub mod storage;
pub mod types;

pub use config::EntitlementsConfig;
pub use error::EntitlementError;
pub use evaluator::{DEFAULT_FREE_TRIP_LIMIT, EntitlementsManager, evaluate, evaluate_with_default};
pub use quota::{TripQuota, check_trip_quota};
#[cfg(feature = "database")]
pub use sea_orm_store::SeaOrmAccountStore;
pub use storage::AccountStore;
#[cfg(any(test, feature = "test-helpers"))]
pub use storage::test::InMemoryAccountStore;
pub use types::{Entitlement, TripSource, UserAccount};
