//! Trip quota checks layered on top of an entitlement snapshot.

use super::types::Entitlement;

/// Result of comparing a user's trip count with their free limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TripQuota {
    /// Pro users have no limit.
    Unlimited,
    /// Another trip may be created.
    WithinLimit { current: u64, max: u32 },
    /// The user owns `max` or more quota-counted trips.
    AtLimit { current: u64, max: u32 },
}

impl TripQuota {
    #[must_use]
    pub fn can_create(&self) -> bool {
        !matches!(self, Self::AtLimit { .. })
    }
}

/// Decide whether the user may create another quota-counted trip.
#[must_use]
pub fn check_trip_quota(entitlement: &Entitlement) -> TripQuota {
    match entitlement.free_trip_limit {
        None => TripQuota::Unlimited,
        Some(max) if entitlement.trip_count < u64::from(max) => TripQuota::WithinLimit {
            current: entitlement.trip_count,
            max,
        },
        Some(max) => TripQuota::AtLimit {
            current: entitlement.trip_count,
            max,
        },
    }
}
