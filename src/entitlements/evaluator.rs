//! Entitlement evaluation.
//!
//! [`evaluate`] is the pure decision; [`EntitlementsManager`] wraps it with
//! the account lookup and trip count a request handler needs.

use super::config::EntitlementsConfig;
use super::error::EntitlementError;
use super::quota::{TripQuota, check_trip_quota};
use super::storage::AccountStore;
use super::types::{Entitlement, UserAccount};

/// Free trip limit applied when neither the account nor the configuration
/// sets one.
pub const DEFAULT_FREE_TRIP_LIMIT: u32 = 5;

/// Evaluate an account with the default free trip limit.
pub fn evaluate(account: &UserAccount, trip_count: u64) -> Entitlement {
    evaluate_with_default(account, trip_count, DEFAULT_FREE_TRIP_LIMIT)
}

/// Evaluate an account, falling back to `default_limit` when the account has
/// no override.
///
/// Pro accounts are always unlimited, whatever their stored limit says.
pub fn evaluate_with_default(
    account: &UserAccount,
    trip_count: u64,
    default_limit: u32,
) -> Entitlement {
    let is_pro = account.is_pro();

    Entitlement {
        is_pro,
        is_admin: account.is_admin,
        is_premium: account.is_premium,
        free_trip_limit: if is_pro {
            None
        } else {
            Some(account.free_trip_limit.unwrap_or(default_limit))
        },
        trip_count,
    }
}

/// Resolves entitlements for users through an [`AccountStore`].
///
/// Every call reads the store; results are never cached.
pub struct EntitlementsManager<S: AccountStore> {
    store: S,
    default_free_trip_limit: u32,
}

impl<S: AccountStore> EntitlementsManager<S> {
    /// Create a manager using the default free trip limit.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            default_free_trip_limit: DEFAULT_FREE_TRIP_LIMIT,
        }
    }

    #[must_use]
    pub fn with_config(store: S, config: &EntitlementsConfig) -> Self {
        Self {
            store,
            default_free_trip_limit: config.default_free_trip_limit,
        }
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the entitlement snapshot for a user.
    ///
    /// # Errors
    ///
    /// Returns [`EntitlementError::AccountNotFound`] when the user has no
    /// account row, and [`EntitlementError::Store`] when a read fails.
    pub async fn get_entitlements(&self, user_id: &str) -> Result<Entitlement, EntitlementError> {
        let account = self
            .store
            .get_account(user_id)
            .await?
            .ok_or_else(|| EntitlementError::AccountNotFound {
                user_id: user_id.to_string(),
            })?;

        let trip_count = self.store.count_quota_trips(user_id).await?;
        let entitlement = evaluate_with_default(&account, trip_count, self.default_free_trip_limit);

        tracing::debug!(
            target: "tripcast::entitlements",
            user_id = %user_id,
            is_pro = entitlement.is_pro,
            trip_count,
            free_trip_limit = ?entitlement.free_trip_limit,
            "Evaluated entitlements"
        );

        Ok(entitlement)
    }

    /// Check the user's trip quota.
    pub async fn check_trip_quota(&self, user_id: &str) -> Result<TripQuota, EntitlementError> {
        let entitlement = self.get_entitlements(user_id).await?;
        Ok(check_trip_quota(&entitlement))
    }

    /// Fail unless the user may create another quota-counted trip.
    ///
    /// Returns the entitlement snapshot the decision was made on.
    pub async fn require_trip_slot(&self, user_id: &str) -> Result<Entitlement, EntitlementError> {
        let entitlement = self.get_entitlements(user_id).await?;

        match check_trip_quota(&entitlement) {
            TripQuota::AtLimit { current, max } => {
                tracing::info!(
                    target: "tripcast::entitlements",
                    user_id = %user_id,
                    current,
                    max,
                    "Trip creation blocked by free limit"
                );
                Err(EntitlementError::TripLimitReached {
                    limit: max,
                    current,
                })
            }
            TripQuota::Unlimited | TripQuota::WithinLimit { .. } => Ok(entitlement),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitlements::storage::test::InMemoryAccountStore;
    use crate::entitlements::types::TripSource;
    use crate::error::TripcastError;
    use async_trait::async_trait;

    #[test]
    fn test_is_pro_matches_flags() {
        for is_admin in [false, true] {
            for is_premium in [false, true] {
                let account = UserAccount {
                    is_admin,
                    is_premium,
                    free_trip_limit: Some(3),
                };
                let entitlement = evaluate(&account, 0);
                assert_eq!(entitlement.is_pro, is_admin || is_premium);
                assert_eq!(entitlement.is_admin, is_admin);
                assert_eq!(entitlement.is_premium, is_premium);
            }
        }
    }

    #[test]
    fn test_missing_limit_defaults_to_five() {
        let entitlement = evaluate(&UserAccount::free(), 2);
        assert!(!entitlement.is_pro);
        assert_eq!(entitlement.free_trip_limit, Some(5));
        assert_eq!(entitlement.trip_count, 2);
    }

    #[test]
    fn test_account_override_wins_over_default() {
        let entitlement = evaluate(&UserAccount::free().with_free_trip_limit(10), 0);
        assert_eq!(entitlement.free_trip_limit, Some(10));

        let entitlement = evaluate(&UserAccount::free().with_free_trip_limit(0), 0);
        assert_eq!(entitlement.free_trip_limit, Some(0));
    }

    #[test]
    fn test_pro_is_unlimited_regardless_of_stored_limit() {
        for account in [
            UserAccount::premium(),
            UserAccount::premium().with_free_trip_limit(1),
            UserAccount::admin().with_free_trip_limit(50),
            UserAccount {
                is_admin: true,
                is_premium: true,
                free_trip_limit: Some(0),
            },
        ] {
            assert_eq!(evaluate(&account, 99).free_trip_limit, None);
        }
    }

    #[test]
    fn test_configured_default_limit() {
        let entitlement = evaluate_with_default(&UserAccount::free(), 0, 8);
        assert_eq!(entitlement.free_trip_limit, Some(8));

        let entitlement = evaluate_with_default(&UserAccount::free().with_free_trip_limit(2), 0, 8);
        assert_eq!(entitlement.free_trip_limit, Some(2));
    }

    #[tokio::test]
    async fn test_get_entitlements() {
        let store = InMemoryAccountStore::new();
        store.insert_account("user_1", UserAccount::free());
        store.add_trip("user_1", TripSource::Manual);
        store.add_trip("user_1", TripSource::Template);
        store.add_trip("user_1", TripSource::Other("imported".to_string()));

        let manager = EntitlementsManager::new(store);
        let entitlement = manager.get_entitlements("user_1").await.unwrap();

        assert!(!entitlement.is_pro);
        assert_eq!(entitlement.free_trip_limit, Some(5));
        assert_eq!(entitlement.trip_count, 2);
    }

    #[tokio::test]
    async fn test_get_entitlements_account_not_found() {
        let manager = EntitlementsManager::new(InMemoryAccountStore::new());

        let err = manager.get_entitlements("ghost").await.unwrap_err();
        assert!(matches!(
            err,
            EntitlementError::AccountNotFound { ref user_id } if user_id == "ghost"
        ));
        assert!(err.is_precondition());
    }

    #[tokio::test]
    async fn test_with_config_default_limit() {
        let store = InMemoryAccountStore::new();
        store.insert_account("user_1", UserAccount::free());

        let config = EntitlementsConfig::default().with_default_free_trip_limit(3);
        let manager = EntitlementsManager::with_config(store, &config);

        let entitlement = manager.get_entitlements("user_1").await.unwrap();
        assert_eq!(entitlement.free_trip_limit, Some(3));
    }

    #[tokio::test]
    async fn test_require_trip_slot() {
        let store = InMemoryAccountStore::new();
        store.insert_account("free", UserAccount::free().with_free_trip_limit(2));
        store.insert_account("pro", UserAccount::premium().with_free_trip_limit(2));
        for _ in 0..2 {
            store.add_trip("free", TripSource::UserEpisodeTrip);
            store.add_trip("pro", TripSource::UserEpisodeTrip);
        }

        let manager = EntitlementsManager::new(store.clone());

        let err = manager.require_trip_slot("free").await.unwrap_err();
        assert!(matches!(
            err,
            EntitlementError::TripLimitReached { limit: 2, current: 2 }
        ));

        let entitlement = manager.require_trip_slot("pro").await.unwrap();
        assert!(entitlement.is_unlimited());

        // Trips outside the allow-list do not consume quota.
        store.insert_account("fresh", UserAccount::free().with_free_trip_limit(1));
        store.add_trip("fresh", TripSource::Other("shared".to_string()));
        assert!(manager.require_trip_slot("fresh").await.is_ok());
    }

    #[tokio::test]
    async fn test_check_trip_quota() {
        let store = InMemoryAccountStore::new();
        store.insert_account("user_1", UserAccount::free());
        store.add_trip("user_1", TripSource::Manual);

        let manager = EntitlementsManager::new(store);
        assert_eq!(
            manager.check_trip_quota("user_1").await.unwrap(),
            TripQuota::WithinLimit { current: 1, max: 5 }
        );
    }

    struct FailingStore;

    #[async_trait]
    impl AccountStore for FailingStore {
        async fn get_account(&self, _user_id: &str) -> crate::error::Result<Option<UserAccount>> {
            Err(TripcastError::service_unavailable("database offline"))
        }

        async fn count_quota_trips(&self, _user_id: &str) -> crate::error::Result<u64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_not_folded_into_result() {
        let manager = EntitlementsManager::new(FailingStore);

        let err = manager.get_entitlements("user_1").await.unwrap_err();
        assert!(matches!(
            err,
            EntitlementError::Store(TripcastError::ServiceUnavailable(_))
        ));
        assert!(!err.is_precondition());
    }
}
