//! Account and entitlement records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The subset of a user row that drives entitlement decisions.
///
/// Read-only to this crate; the users table is owned elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub is_admin: bool,
    pub is_premium: bool,
    /// Per-user override of the free trip limit. `None` falls back to the
    /// configured default.
    pub free_trip_limit: Option<u32>,
}

impl UserAccount {
    /// A regular account with no flags and no limit override.
    #[must_use]
    pub fn free() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn premium() -> Self {
        Self {
            is_premium: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn admin() -> Self {
        Self {
            is_admin: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_free_trip_limit(mut self, limit: u32) -> Self {
        self.free_trip_limit = Some(limit);
        self
    }

    /// Admins and premium subscribers are Pro.
    #[must_use]
    pub fn is_pro(&self) -> bool {
        self.is_admin || self.is_premium
    }
}

/// Where a trip came from, as stored in `trips.source_type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TripSource {
    /// `source_type IS NULL`: planned by hand.
    Manual,
    /// Created from a curated template.
    Template,
    /// Generated by the user from a podcast episode.
    UserEpisodeTrip,
    /// Any other source type. These never count against the free quota.
    Other(String),
}

impl TripSource {
    /// Stored values that count against the free quota, besides NULL.
    pub const QUOTA_SOURCE_TYPES: [&'static str; 2] = ["template", "user_episode_trip"];

    /// Parse the nullable `source_type` column.
    #[must_use]
    pub fn from_column(value: Option<&str>) -> Self {
        match value {
            None => Self::Manual,
            Some("template") => Self::Template,
            Some("user_episode_trip") => Self::UserEpisodeTrip,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    /// The column value for this source.
    #[must_use]
    pub fn as_column(&self) -> Option<&str> {
        match self {
            Self::Manual => None,
            Self::Template => Some("template"),
            Self::UserEpisodeTrip => Some("user_episode_trip"),
            Self::Other(value) => Some(value.as_str()),
        }
    }

    #[must_use]
    pub fn counts_toward_quota(&self) -> bool {
        matches!(self, Self::Manual | Self::Template | Self::UserEpisodeTrip)
    }
}

impl fmt::Display for TripSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_column().unwrap_or("manual"))
    }
}

/// Trip quota snapshot for one user.
///
/// Computed fresh for every request and never persisted. Serializes in the
/// shape the mobile client expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct Entitlement {
    pub is_pro: bool,
    pub is_admin: bool,
    pub is_premium: bool,
    /// `None` means unlimited.
    pub free_trip_limit: Option<u32>,
    pub trip_count: u64,
}

impl Entitlement {
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        self.free_trip_limit.is_none()
    }

    /// Trips left before the free limit is hit. `None` when unlimited.
    #[must_use]
    pub fn remaining_trips(&self) -> Option<u64> {
        self.free_trip_limit
            .map(|limit| u64::from(limit).saturating_sub(self.trip_count))
    }
}
