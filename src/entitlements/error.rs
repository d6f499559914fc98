//! Entitlement-specific error types.

use std::fmt;

use crate::error::TripcastError;

/// Errors raised while resolving a user's entitlement.
///
/// `AccountNotFound` and `TripLimitReached` are precondition failures and are
/// surfaced to the caller as-is. Nothing in this module retries.
#[derive(Debug)]
pub enum EntitlementError {
    /// The user id did not resolve to an account row.
    AccountNotFound { user_id: String },
    /// A non-pro user already owns as many quota-counted trips as allowed.
    TripLimitReached { limit: u32, current: u64 },
    /// The account store failed.
    Store(TripcastError),
}

impl fmt::Display for EntitlementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccountNotFound { user_id } => {
                write!(f, "Account not found: {}", user_id)
            }
            Self::TripLimitReached { limit, current } => {
                write!(f, "Free trip limit reached ({} of {} trips)", current, limit)
            }
            Self::Store(err) => write!(f, "Account store error: {}", err),
        }
    }
}

impl std::error::Error for EntitlementError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TripcastError> for EntitlementError {
    fn from(err: TripcastError) -> Self {
        Self::Store(err)
    }
}

impl From<EntitlementError> for TripcastError {
    fn from(err: EntitlementError) -> Self {
        match err {
            EntitlementError::AccountNotFound { .. } => TripcastError::NotFound(err.to_string()),
            EntitlementError::TripLimitReached { .. } => TripcastError::Forbidden(err.to_string()),
            EntitlementError::Store(inner) => inner,
        }
    }
}

impl EntitlementError {
    /// Whether the failure is a caller precondition rather than a store fault.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound { .. } | Self::TripLimitReached { .. }
        )
    }
}
