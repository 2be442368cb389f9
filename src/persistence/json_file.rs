//! JSON file implementation of the snapshot store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::SnapshotStore;
use crate::domain::Snapshot;
use crate::error::TrackerError;

/// Stores the snapshot as pretty-printed JSON at a fixed path.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target. A crash mid-write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> Result<Option<Snapshot>, TrackerError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(TrackerError::Persistence(format!(
                    "reading {} failed: {e}",
                    self.path.display()
                )));
            }
        };

        let snapshot = serde_json::from_slice(&bytes).map_err(|e| {
            TrackerError::Persistence(format!("decoding {} failed: {e}", self.path.display()))
        })?;
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), TrackerError> {
        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| TrackerError::Persistence(format!("encoding snapshot failed: {e}")))?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await.map_err(|e| {
            TrackerError::Persistence(format!("writing {} failed: {e}", temp.display()))
        })?;
        tokio::fs::rename(&temp, &self.path).await.map_err(|e| {
            TrackerError::Persistence(format!("replacing {} failed: {e}", self.path.display()))
        })?;

        tracing::debug!(path = %self.path.display(), members = snapshot.len(), "snapshot saved");
        Ok(())
    }
}
