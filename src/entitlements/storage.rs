//! Storage traits for entitlement lookups.
//!
//! Implement [`AccountStore`] against your database. An in-memory
//! implementation is provided for testing.

use crate::error::Result;
use async_trait::async_trait;

use super::types::UserAccount;

/// Read access to the account and trip tables.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Load the entitlement-relevant flags for a user.
    ///
    /// Returns `Ok(None)` when no row exists for `user_id`.
    async fn get_account(&self, user_id: &str) -> Result<Option<UserAccount>>;

    /// Count the trips owned by `user_id` whose source type counts toward
    /// the free quota (NULL, `template`, `user_episode_trip`).
    async fn count_quota_trips(&self, user_id: &str) -> Result<u64>;
}

/// In-memory account store for testing.
#[cfg(any(test, feature = "test-helpers"))]
pub mod test {
    use super::*;
    use crate::entitlements::types::TripSource;
    use std::collections::HashMap;
    use std::sync::{Arc, RwLock};

    /// In-memory account store for testing.
    ///
    /// Wraps data in Arc for cheap cloning.
    #[derive(Default, Clone)]
    pub struct InMemoryAccountStore {
        inner: Arc<InMemoryAccountStoreInner>,
    }

    #[derive(Default)]
    struct InMemoryAccountStoreInner {
        accounts: RwLock<HashMap<String, UserAccount>>,
        trips: RwLock<Vec<(String, TripSource)>>,
    }

    impl InMemoryAccountStore {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Insert or replace an account.
        pub fn insert_account(&self, user_id: &str, account: UserAccount) {
            self.inner
                .accounts
                .write()
                .unwrap()
                .insert(user_id.to_string(), account);
        }

        /// Record a trip owned by `user_id`.
        pub fn add_trip(&self, user_id: &str, source: TripSource) {
            self.inner
                .trips
                .write()
                .unwrap()
                .push((user_id.to_string(), source));
        }

        /// Total trips owned by `user_id`, quota-counted or not.
        pub fn trip_count(&self, user_id: &str) -> usize {
            self.inner
                .trips
                .read()
                .unwrap()
                .iter()
                .filter(|(owner, _)| owner == user_id)
                .count()
        }
    }

    #[async_trait]
    impl AccountStore for InMemoryAccountStore {
        async fn get_account(&self, user_id: &str) -> Result<Option<UserAccount>> {
            Ok(self.inner.accounts.read().unwrap().get(user_id).copied())
        }

        async fn count_quota_trips(&self, user_id: &str) -> Result<u64> {
            let trips = self.inner.trips.read().unwrap();
            let count = trips
                .iter()
                .filter(|(owner, source)| owner == user_id && source.counts_toward_quota())
                .count();
            Ok(count as u64)
        }
    }
}
