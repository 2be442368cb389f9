//! Persistence layer: the latest snapshot survives restarts.
//!
//! Provides the [`SnapshotStore`] trait the tracker saves through after
//! every successful poll. The concrete implementation writes JSON to a
//! single file.

pub mod json_file;

use async_trait::async_trait;

use crate::domain::Snapshot;
use crate::error::TrackerError;

pub use json_file::JsonFileStore;

/// Durable storage for a single snapshot.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Loads the stored snapshot, or `None` if nothing was stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] if stored data exists but
    /// cannot be read or decoded.
    async fn load(&self) -> Result<Option<Snapshot>, TrackerError>;

    /// Replaces the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] on I/O or encoding failure.
    async fn save(&self, snapshot: &Snapshot) -> Result<(), TrackerError>;
}
