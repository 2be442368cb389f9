//! In-memory collaborators for tracker and dispatch tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::aoc::LeaderboardSource;
use crate::discord::Notifier;
use crate::domain::Snapshot;
use crate::error::TrackerError;
use crate::persistence::SnapshotStore;
use crate::view::Embed;

/// Returns queued results in order; an empty queue is a retrieval error.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    results: Arc<Mutex<VecDeque<Result<Snapshot, String>>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSource {
    pub fn with(results: Vec<Result<Snapshot, String>>) -> Self {
        Self {
            results: Arc::new(Mutex::new(results.into())),
            requested: Arc::default(),
        }
    }

    /// Leaderboard ids fetched so far.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LeaderboardSource for ScriptedSource {
    async fn fetch(&self, leaderboard_id: &str) -> Result<Snapshot, TrackerError> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(leaderboard_id.to_string());
        }
        let next = self.results.lock().ok().and_then(|mut q| q.pop_front());
        match next {
            Some(Ok(snapshot)) => Ok(snapshot),
            Some(Err(message)) => Err(TrackerError::Retrieval(message)),
            None => Err(TrackerError::Retrieval("no scripted result".to_string())),
        }
    }
}

/// A delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text(String),
    Embed(Embed),
}

/// Records every delivered message; can be told to fail the first sends.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, Sent)>>>,
    failures_left: Arc<Mutex<usize>>,
}

impl RecordingNotifier {
    pub fn failing_first(count: usize) -> Self {
        Self {
            sent: Arc::default(),
            failures_left: Arc::new(Mutex::new(count)),
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent
            .lock()
            .map(|s| s.iter().map(|(_, m)| m.clone()).collect())
            .unwrap_or_default()
    }

    pub fn channels(&self) -> Vec<String> {
        self.sent
            .lock()
            .map(|s| s.iter().map(|(c, _)| c.clone()).collect())
            .unwrap_or_default()
    }

    fn record(&self, channel_id: &str, message: Sent) -> Result<(), TrackerError> {
        if let Ok(mut left) = self.failures_left.lock()
            && *left > 0
        {
            *left -= 1;
            return Err(TrackerError::Notify("scripted failure".to_string()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((channel_id.to_string(), message));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<(), TrackerError> {
        self.record(channel_id, Sent::Text(text.to_string()))
    }

    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<(), TrackerError> {
        self.record(channel_id, Sent::Embed(embed.clone()))
    }
}

/// Keeps the last saved snapshot in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Arc<Mutex<Option<Snapshot>>>,
    fail: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            saved: Arc::default(),
            fail: true,
        }
    }

    pub fn saved(&self) -> Option<Snapshot> {
        self.saved.lock().ok().and_then(|s| s.clone())
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Option<Snapshot>, TrackerError> {
        Ok(self.saved())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), TrackerError> {
        if self.fail {
            return Err(TrackerError::Persistence("scripted failure".to_string()));
        }
        if let Ok(mut saved) = self.saved.lock() {
            *saved = Some(snapshot.clone());
        }
        Ok(())
    }
}
