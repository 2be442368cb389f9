//! Change detection between two successive snapshots.
//!
//! Pure functions: no I/O, no logging. Output order is ascending
//! participant id, inherited from the ordered participant map, so the same
//! pair of snapshots always yields the same lists.

use super::{ParticipantId, Snapshot};

/// Observable changes between a previous and a current snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// Display names of participants whose star count increased.
    pub new_stars: Vec<String>,
    /// Display names of participants absent from the previous snapshot.
    pub new_members: Vec<String>,
}

impl SnapshotDiff {
    /// Returns `true` if either list is non-empty.
    #[must_use]
    pub fn has_updates(&self) -> bool {
        !self.new_stars.is_empty() || !self.new_members.is_empty()
    }
}

/// Computes the [`SnapshotDiff`] between `previous` and `current`.
///
/// With no previous snapshot there is nothing to compare star counts
/// against, so `new_stars` is empty while every current participant counts
/// as a new member.
#[must_use]
pub fn diff(previous: Option<&Snapshot>, current: &Snapshot) -> SnapshotDiff {
    SnapshotDiff {
        new_stars: new_stars(previous, current),
        new_members: new_members(previous, current),
    }
}

/// Names of participants present in both snapshots whose star count went up.
#[must_use]
pub fn new_stars(previous: Option<&Snapshot>, current: &Snapshot) -> Vec<String> {
    let Some(previous) = previous else {
        return Vec::new();
    };
    current
        .participants
        .values()
        .filter(|member| {
            previous
                .participant(member.id)
                .is_some_and(|before| member.star_count > before.star_count)
        })
        .map(|member| member.display_name())
        .collect()
}

/// Names of participants in `current` that `previous` does not contain.
#[must_use]
pub fn new_members(previous: Option<&Snapshot>, current: &Snapshot) -> Vec<String> {
    current
        .participants
        .values()
        .filter(|member| previous.is_none_or(|prev| prev.participant(member.id).is_none()))
        .map(|member| member.display_name())
        .collect()
}

/// Ids of participants whose star count went down between snapshots.
///
/// Stars are expected to be monotonic; a decrease means the source returned
/// stale or reset data. Such participants never appear in `new_stars`.
#[must_use]
pub fn star_regressions(previous: Option<&Snapshot>, current: &Snapshot) -> Vec<ParticipantId> {
    let Some(previous) = previous else {
        return Vec::new();
    };
    current
        .participants
        .values()
        .filter(|member| {
            previous
                .participant(member.id)
                .is_some_and(|before| member.star_count < before.star_count)
        })
        .map(|member| member.id)
        .collect()
}
