//! Type-safe participant identifier.
//!
//! [`ParticipantId`] is a newtype wrapper around the numeric member id the
//! leaderboard API assigns, so ids cannot be confused with scores or star
//! counts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a leaderboard participant.
///
/// Stable across snapshots: the same competitor keeps the same id. Used as
/// the ordered map key in [`super::Snapshot`], which makes ascending id the
/// default presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(u64);

impl ParticipantId {
    /// Creates a `ParticipantId` from the raw numeric id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ParticipantId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ParticipantId> for u64 {
    fn from(id: ParticipantId) -> Self {
        id.0
    }
}
