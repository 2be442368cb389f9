//! Point-in-time leaderboard state.
//!
//! A [`Snapshot`] is decoded whole from one leaderboard read and never
//! mutated afterwards; the next poll produces a fresh value that replaces
//! it. The serde layout mirrors the private-leaderboard JSON so the same
//! types serve decoding and persistence.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ParticipantId;

/// Day number within the event (1-based).
pub type Day = u8;

/// One leaderboard read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Event identifier, usually the year (e.g. `"2024"`).
    #[serde(rename = "event")]
    pub event_id: String,

    /// Member id of the leaderboard owner.
    pub owner_id: u64,

    /// Participants keyed by id, iterated in ascending id order.
    #[serde(rename = "members", default)]
    pub participants: BTreeMap<ParticipantId, Participant>,
}

impl Snapshot {
    /// Creates a snapshot from a set of participants.
    #[must_use]
    pub fn new(
        event_id: impl Into<String>,
        owner_id: u64,
        participants: impl IntoIterator<Item = Participant>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            owner_id,
            participants: participants.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    /// Returns the participant with the given id, if present.
    #[must_use]
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    /// Number of participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Returns `true` if the snapshot has no participants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

/// One tracked competitor within a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable member id.
    pub id: ParticipantId,

    /// Display name; `None` for anonymous members.
    pub name: Option<String>,

    /// Score on this private leaderboard.
    pub local_score: u32,

    /// Score on the global leaderboard.
    #[serde(default)]
    pub global_score: u32,

    /// Total stars earned so far.
    #[serde(rename = "stars")]
    pub star_count: u32,

    /// When the most recent star was earned (epoch for none).
    #[serde(rename = "last_star_ts", with = "chrono::serde::ts_seconds")]
    pub last_star_time: DateTime<Utc>,

    /// Per-day completion records, keyed by day number.
    #[serde(rename = "completion_day_level", default)]
    pub completions: BTreeMap<Day, DayCompletion>,
}

impl Participant {
    /// Creates a participant with no completion records.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, local_score: u32, star_count: u32) -> Self {
        Self {
            id: ParticipantId::new(id),
            name: Some(name.into()),
            local_score,
            global_score: 0,
            star_count,
            last_star_time: DateTime::default(),
            completions: BTreeMap::new(),
        }
    }

    /// Returns the participant with a completion record added for `day`.
    #[must_use]
    pub fn with_completion(mut self, day: Day, completion: DayCompletion) -> Self {
        self.completions.insert(day, completion);
        self
    }

    /// Name shown in messages and views.
    ///
    /// Anonymous members are rendered as `(anonymous user #<id>)`.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("(anonymous user #{})", self.id),
        }
    }

    /// Completion record for `day`, if any star was earned that day.
    #[must_use]
    pub fn completion(&self, day: Day) -> Option<&DayCompletion> {
        self.completions.get(&day)
    }

    /// Whether the first level of `day` was earned.
    #[must_use]
    pub fn has_level_one(&self, day: Day) -> bool {
        self.completion(day).is_some_and(|c| c.level_one.is_some())
    }

    /// Whether the second level of `day` was earned.
    #[must_use]
    pub fn has_level_two(&self, day: Day) -> bool {
        self.completion(day).is_some_and(|c| c.level_two.is_some())
    }
}

/// Stars earned on one day. A day has at most two levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCompletion {
    /// First level of the day's puzzle.
    #[serde(rename = "1", default, skip_serializing_if = "Option::is_none")]
    pub level_one: Option<StarDetail>,

    /// Second level of the day's puzzle.
    #[serde(rename = "2", default, skip_serializing_if = "Option::is_none")]
    pub level_two: Option<StarDetail>,
}

impl DayCompletion {
    /// Only the first level earned.
    #[must_use]
    pub const fn level_one(detail: StarDetail) -> Self {
        Self {
            level_one: Some(detail),
            level_two: None,
        }
    }

    /// Both levels earned.
    #[must_use]
    pub const fn both(first: StarDetail, second: StarDetail) -> Self {
        Self {
            level_one: Some(first),
            level_two: Some(second),
        }
    }
}

/// When a single star was earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarDetail {
    /// Time the star was earned.
    #[serde(rename = "get_star_ts", with = "chrono::serde::ts_seconds")]
    pub earned_time: DateTime<Utc>,

    /// Event-wide ordering counter; informational only.
    pub star_index: u64,
}

impl StarDetail {
    /// Creates a star detail from a unix timestamp in seconds.
    ///
    /// Out-of-range timestamps clamp to the epoch.
    #[must_use]
    pub fn at(unix_secs: i64, star_index: u64) -> Self {
        Self {
            earned_time: DateTime::from_timestamp(unix_secs, 0).unwrap_or_default(),
            star_index,
        }
    }
}
