//! Leaderboard retrieval.
//!
//! [`LeaderboardSource`] is the seam the tracker polls through;
//! [`AocClient`] is the HTTP implementation against the private
//! leaderboard JSON endpoint.

pub mod client;

use async_trait::async_trait;

use crate::domain::Snapshot;
use crate::error::TrackerError;

pub use client::AocClient;

/// Produces a fresh [`Snapshot`] of a leaderboard.
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    /// Fetches the current state of `leaderboard_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Retrieval`] for any network, authentication
    /// or decoding failure.
    async fn fetch(&self, leaderboard_id: &str) -> Result<Snapshot, TrackerError>;
}
