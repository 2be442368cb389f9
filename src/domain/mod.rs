//! Domain layer: snapshot model and change detection.
//!
//! This module contains the immutable leaderboard model decoded from each
//! poll, the participant identity type, and the pure differ that compares
//! two snapshots.

pub mod diff;
pub mod participant_id;
pub mod snapshot;

pub use diff::{SnapshotDiff, diff};
pub use participant_id::ParticipantId;
pub use snapshot::{Day, DayCompletion, Participant, Snapshot, StarDetail};
