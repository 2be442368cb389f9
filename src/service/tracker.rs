//! Leaderboard tracker: poll, diff, notify.
//!
//! The tracker exclusively owns the two live snapshots. It holds no lock;
//! callers serialize triggers (the dispatch loop in `main` handles one tick
//! or command at a time), so a cycle always runs to completion before the
//! next one starts.

use chrono::{DateTime, TimeDelta, Utc};

use crate::aoc::LeaderboardSource;
use crate::discord::Notifier;
use crate::domain::diff::star_regressions;
use crate::domain::{Snapshot, SnapshotDiff, diff};
use crate::error::TrackerError;
use crate::persistence::SnapshotStore;
use crate::view::{Embed, messages, render_scoreboard, render_stars};

/// Minimum time between manual updates, measured from poll start.
pub const UPDATE_COOLDOWN: TimeDelta = TimeDelta::minutes(15);

/// Phase of the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Waiting for a tick or command.
    Idle,
    /// Fetching a new snapshot.
    Polling,
    /// Comparing previous and current snapshots.
    Diffing,
    /// Sending notifications.
    Notifying,
}

/// Result of a manual update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Rejected: the last successful poll started too recently.
    CoolingDown {
        /// Time left until another manual update is accepted.
        retry_after: TimeDelta,
    },
    /// Polled, nothing changed.
    NoUpdates,
    /// Polled and announced the changes.
    Updated(SnapshotDiff),
}

/// Stateful orchestrator around the retrieval, notification and storage
/// collaborators.
#[derive(Debug)]
pub struct Tracker<S, N, P> {
    source: S,
    notifier: N,
    store: P,
    leaderboard_id: String,
    channel_id: String,
    previous: Option<Snapshot>,
    current: Option<Snapshot>,
    last_update: Option<DateTime<Utc>>,
    state: TrackerState,
    #[cfg(test)]
    visited: Vec<TrackerState>,
}

impl<S, N, P> Tracker<S, N, P>
where
    S: LeaderboardSource,
    N: Notifier,
    P: SnapshotStore,
{
    /// Creates a tracker seeded with a previously stored snapshot.
    ///
    /// `stored` becomes the current snapshot, so the first poll diffs
    /// against it instead of announcing every participant as new.
    #[must_use]
    pub fn new(
        source: S,
        notifier: N,
        store: P,
        leaderboard_id: impl Into<String>,
        channel_id: impl Into<String>,
        stored: Option<Snapshot>,
    ) -> Self {
        Self {
            source,
            notifier,
            store,
            leaderboard_id: leaderboard_id.into(),
            channel_id: channel_id.into(),
            previous: None,
            current: stored,
            last_update: None,
            state: TrackerState::Idle,
            #[cfg(test)]
            visited: Vec::new(),
        }
    }

    /// Snapshot before the last successful poll.
    #[must_use]
    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    /// Snapshot from the last successful poll (or the stored one).
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    /// Start time of the last successful poll.
    #[must_use]
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Current cycle phase.
    #[must_use]
    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Channel the tracker posts in and accepts commands from.
    #[must_use]
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Time left before a manual update is accepted, if any.
    #[must_use]
    pub fn cooldown_remaining(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        let elapsed = now - self.last_update?;
        (elapsed < UPDATE_COOLDOWN).then(|| UPDATE_COOLDOWN - elapsed)
    }

    /// Fetches a new snapshot and shifts the current one into `previous`.
    ///
    /// `now` is recorded as the poll start on success. The new snapshot is
    /// persisted; a storage failure is logged and does not fail the poll.
    ///
    /// # Errors
    ///
    /// Propagates the retrieval failure. Both snapshots and the last
    /// update time are left untouched.
    pub async fn poll(&mut self, now: DateTime<Utc>) -> Result<(), TrackerError> {
        let result = self.fetch_and_install(now).await;
        self.transition(TrackerState::Idle);
        result
    }

    /// Polling phase shared by [`Self::poll`] and [`Self::run_cycle`].
    /// Leaves the tracker in `Polling`; the caller picks the next state.
    async fn fetch_and_install(&mut self, now: DateTime<Utc>) -> Result<(), TrackerError> {
        self.transition(TrackerState::Polling);
        let snapshot = self.source.fetch(&self.leaderboard_id).await?;
        tracing::info!(
            leaderboard = %self.leaderboard_id,
            members = snapshot.len(),
            "leaderboard fetched"
        );

        if let Err(e) = self.store.save(&snapshot).await {
            tracing::warn!(error = %e, "failed to persist snapshot");
        }

        self.previous = self.current.replace(snapshot);
        self.last_update = Some(now);
        Ok(())
    }

    /// Compares the previous and current snapshots.
    ///
    /// Star count decreases are logged, never reported as changes.
    #[must_use]
    pub fn diff(&self) -> SnapshotDiff {
        let Some(current) = self.current.as_ref() else {
            return SnapshotDiff::default();
        };
        for id in star_regressions(self.previous.as_ref(), current) {
            tracing::warn!(participant = %id, "star count decreased between polls");
        }
        diff(self.previous.as_ref(), current)
    }

    /// Announces the changes in `changes`.
    ///
    /// One message per new star; one announcement followed by one message
    /// per new member; then the scoreboard if anything changed. Every send
    /// is best-effort.
    pub async fn notify(&self, changes: &SnapshotDiff) {
        for name in &changes.new_stars {
            self.send_text(&messages::new_star(name)).await;
        }

        if !changes.new_members.is_empty() {
            self.send_text(messages::NEW_MEMBERS_ANNOUNCEMENT).await;
            for name in &changes.new_members {
                self.send_text(&messages::new_member(name)).await;
            }
        }

        if changes.has_updates()
            && let Some(embed) = render_scoreboard(self.current.as_ref())
        {
            self.send_embed(&embed).await;
        }
    }

    /// Runs one full poll, diff and notify cycle.
    ///
    /// Used for scheduled ticks; no cool-down applies.
    ///
    /// # Errors
    ///
    /// Propagates a retrieval failure from [`Self::poll`]; nothing is
    /// diffed or sent in that case.
    pub async fn run_cycle(&mut self, now: DateTime<Utc>) -> Result<SnapshotDiff, TrackerError> {
        if let Err(e) = self.fetch_and_install(now).await {
            self.transition(TrackerState::Idle);
            return Err(e);
        }

        self.transition(TrackerState::Diffing);
        let changes = self.diff();
        if changes.has_updates() {
            tracing::info!(
                new_stars = ?changes.new_stars,
                new_members = ?changes.new_members,
                "leaderboard changed"
            );
        }

        self.transition(TrackerState::Notifying);
        self.notify(&changes).await;
        self.transition(TrackerState::Idle);

        Ok(changes)
    }

    /// Handles a manual update request.
    ///
    /// Inside the cool-down window the request is answered with a fixed
    /// notice and nothing is fetched. Otherwise a cycle runs, and a cycle
    /// without changes is answered with a "no updates" notice.
    ///
    /// # Errors
    ///
    /// Propagates a retrieval failure from the cycle.
    pub async fn request_update(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<UpdateOutcome, TrackerError> {
        if let Some(retry_after) = self.cooldown_remaining(now) {
            tracing::info!(retry_after_secs = retry_after.num_seconds(), "update rejected");
            self.send_text(messages::COOLDOWN_NOTICE).await;
            return Ok(UpdateOutcome::CoolingDown { retry_after });
        }

        let changes = self.run_cycle(now).await?;
        if changes.has_updates() {
            Ok(UpdateOutcome::Updated(changes))
        } else {
            self.send_text(messages::NO_UPDATES).await;
            Ok(UpdateOutcome::NoUpdates)
        }
    }

    /// Sends the scoreboard for the current snapshot.
    ///
    /// Sends nothing if there is no snapshot or it has no participants.
    pub async fn show_leaderboard(&self) {
        match render_scoreboard(self.current.as_ref()) {
            Some(embed) => self.send_embed(&embed).await,
            None => tracing::debug!("no scoreboard to show"),
        }
    }

    /// Sends the star grid for the current snapshot.
    pub async fn show_stars(&self) {
        match render_stars(self.current.as_ref()) {
            Some(embed) => self.send_embed(&embed).await,
            None => tracing::debug!("no star grid to show"),
        }
    }

    /// Sends the command listing.
    pub async fn show_help(&self) {
        self.send_text(&messages::help_text()).await;
    }

    /// Sends a text message, logging failure instead of returning it.
    pub async fn send_text(&self, text: &str) {
        if let Err(e) = self.notifier.send_text(&self.channel_id, text).await {
            tracing::warn!(error = %e, "failed to send message");
        }
    }

    async fn send_embed(&self, embed: &Embed) {
        if let Err(e) = self.notifier.send_embed(&self.channel_id, embed).await {
            tracing::warn!(error = %e, title = %embed.title, "failed to send embed");
        }
    }

    fn transition(&mut self, next: TrackerState) {
        tracing::trace!(from = ?self.state, to = ?next, "tracker state");
        self.state = next;
        #[cfg(test)]
        self.visited.push(next);
    }
}
