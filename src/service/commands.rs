//! Chat command parsing and routing.

use std::fmt;

use chrono::{DateTime, Utc};

use super::tracker::{Tracker, UpdateOutcome};
use crate::aoc::LeaderboardSource;
use crate::discord::{IncomingMessage, Notifier};
use crate::persistence::SnapshotStore;
use crate::view::messages;

/// Commands the bot answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `!update`: manual poll, subject to the cool-down.
    Update,
    /// `!leaderboard`: current scoreboard.
    Leaderboard,
    /// `!stars`: current star grid.
    Stars,
    /// `!help`: command listing.
    Help,
}

impl Command {
    /// Parses a message body. Matching is case-insensitive and ignores
    /// surrounding whitespace; anything else yields `None`.
    #[must_use]
    pub fn parse(content: &str) -> Option<Self> {
        match content.trim().to_lowercase().as_str() {
            "!update" => Some(Self::Update),
            "!leaderboard" => Some(Self::Leaderboard),
            "!stars" => Some(Self::Stars),
            "!help" => Some(Self::Help),
            _ => None,
        }
    }

    /// Command word as typed in chat.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Update => "!update",
            Self::Leaderboard => "!leaderboard",
            Self::Stars => "!stars",
            Self::Help => "!help",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routes one chat message to the tracker.
///
/// Messages written by the bot itself (`bot_user_id`) or posted outside
/// the tracker's channel are dropped. Until the bot's own id is known
/// (`None`), every message is dropped. A failed manual update is logged and
/// answered with a short notice; it never propagates.
///
/// Returns the command that was handled, if any.
pub async fn dispatch<S, N, P>(
    tracker: &mut Tracker<S, N, P>,
    message: &IncomingMessage,
    bot_user_id: Option<&str>,
    now: DateTime<Utc>,
) -> Option<Command>
where
    S: LeaderboardSource,
    N: Notifier,
    P: SnapshotStore,
{
    let bot_user_id = bot_user_id?;
    if message.author_id == bot_user_id || message.channel_id != tracker.channel_id() {
        return None;
    }

    let command = Command::parse(&message.content)?;
    tracing::info!(%command, author = %message.author_id, "command received");

    match command {
        Command::Update => match tracker.request_update(now).await {
            Ok(UpdateOutcome::Updated(changes)) => {
                tracing::debug!(
                    new_stars = changes.new_stars.len(),
                    new_members = changes.new_members.len(),
                    "manual update found changes"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, kind = e.kind(), "manual update failed");
                tracker.send_text(messages::UPDATE_FAILED).await;
            }
        },
        Command::Leaderboard => tracker.show_leaderboard().await,
        Command::Stars => tracker.show_stars().await,
        Command::Help => tracker.show_help().await,
    }

    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Participant, Snapshot};
    use crate::service::testing::{MemoryStore, RecordingNotifier, ScriptedSource, Sent};

    const BOT: &str = "bot-user";
    const CHANNEL: &str = "test-channel";

    fn message(author: &str, channel: &str, content: &str) -> IncomingMessage {
        IncomingMessage {
            author_id: author.to_string(),
            channel_id: channel.to_string(),
            content: content.to_string(),
        }
    }

    fn setup(
        results: Vec<Result<Snapshot, String>>,
        stored: Option<Snapshot>,
    ) -> (
        Tracker<ScriptedSource, RecordingNotifier, MemoryStore>,
        ScriptedSource,
        RecordingNotifier,
    ) {
        let source = ScriptedSource::with(results);
        let notifier = RecordingNotifier::default();
        let tracker = Tracker::new(
            source.clone(),
            notifier.clone(),
            MemoryStore::default(),
            "test-leaderboard",
            CHANNEL,
            stored,
        );
        (tracker, source, notifier)
    }

    fn sample() -> Snapshot {
        Snapshot::new("2024", 1, [Participant::new(1, "Alice", 300, 5)])
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Command::parse("!update"), Some(Command::Update));
        assert_eq!(Command::parse("!UPDATE"), Some(Command::Update));
        assert_eq!(Command::parse("!LeaderBoard"), Some(Command::Leaderboard));
        assert_eq!(Command::parse("  !stars \n"), Some(Command::Stars));
        assert_eq!(Command::parse("!Help"), Some(Command::Help));
    }

    #[test]
    fn parse_rejects_other_text() {
        assert_eq!(Command::parse("update"), None);
        assert_eq!(Command::parse("!update now"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn display_matches_command_word() {
        assert_eq!(Command::Stars.to_string(), "!stars");
    }

    #[tokio::test]
    async fn own_messages_are_ignored() {
        let (mut tracker, source, notifier) = setup(vec![Ok(sample())], None);
        let msg = message(BOT, CHANNEL, "!update");
        let handled = dispatch(&mut tracker, &msg, Some(BOT), Utc::now()).await;
        assert_eq!(handled, None);
        assert!(source.requested().is_empty());
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn other_channels_are_ignored() {
        let (mut tracker, _, notifier) = setup(vec![], Some(sample()));
        let handled = dispatch(
            &mut tracker,
            &message("user", "elsewhere", "!leaderboard"),
            Some(BOT),
            Utc::now(),
        )
        .await;
        assert_eq!(handled, None);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn leaderboard_command_sends_scoreboard() {
        let (mut tracker, _, notifier) = setup(vec![], Some(sample()));
        let handled = dispatch(
            &mut tracker,
            &message("user", CHANNEL, "!LEADERBOARD"),
            Some(BOT),
            Utc::now(),
        )
        .await;
        assert_eq!(handled, Some(Command::Leaderboard));
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(matches!(sent.first(), Some(Sent::Embed(e)) if e.title == "AoC Leaderboard:"));
    }

    #[tokio::test]
    async fn stars_command_sends_grid() {
        let (mut tracker, _, notifier) = setup(vec![], Some(sample()));
        let msg = message("user", CHANNEL, "!stars");
        dispatch(&mut tracker, &msg, Some(BOT), Utc::now()).await;
        assert!(matches!(notifier.sent().first(), Some(Sent::Embed(e)) if e.title == "AoC Stars:"));
    }

    #[tokio::test]
    async fn help_command_sends_listing() {
        let (mut tracker, _, notifier) = setup(vec![], None);
        dispatch(&mut tracker, &message("user", CHANNEL, "!help"), Some(BOT), Utc::now()).await;
        assert_eq!(notifier.sent(), vec![Sent::Text(messages::help_text())]);
    }

    #[tokio::test]
    async fn messages_before_ready_are_ignored() {
        let (mut tracker, source, notifier) = setup(vec![Ok(sample())], Some(sample()));
        for content in ["!help", "!update", "!stars"] {
            let msg = message("user", CHANNEL, content);
            assert_eq!(dispatch(&mut tracker, &msg, None, Utc::now()).await, None);
        }
        assert!(source.requested().is_empty());
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn failed_update_is_answered_not_propagated() {
        let (mut tracker, _, notifier) =
            setup(vec![Err("API error".to_string())], Some(sample()));
        let msg = message("user", CHANNEL, "!update");
        let handled = dispatch(&mut tracker, &msg, Some(BOT), Utc::now()).await;
        assert_eq!(handled, Some(Command::Update));
        assert_eq!(
            notifier.sent(),
            vec![Sent::Text(messages::UPDATE_FAILED.to_string())]
        );
        assert_eq!(tracker.current(), Some(&sample()));
    }

    #[tokio::test]
    async fn second_update_inside_cooldown_gets_notice() {
        let (mut tracker, source, notifier) =
            setup(vec![Ok(sample()), Ok(sample())], Some(sample()));
        let first = Utc::now();
        let second = first + chrono::TimeDelta::minutes(5);

        let msg = message("user", CHANNEL, "!update");
        dispatch(&mut tracker, &msg, Some(BOT), first).await;
        dispatch(&mut tracker, &msg, Some(BOT), second).await;

        assert_eq!(source.requested().len(), 1);
        assert_eq!(
            notifier.sent(),
            vec![
                Sent::Text(messages::NO_UPDATES.to_string()),
                Sent::Text(messages::COOLDOWN_NOTICE.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_text_is_ignored() {
        let (mut tracker, _, notifier) = setup(vec![], Some(sample()));
        let msg = message("user", CHANNEL, "good morning");
        let handled = dispatch(&mut tracker, &msg, Some(BOT), Utc::now()).await;
        assert_eq!(handled, None);
        assert!(notifier.sent().is_empty());
    }
}
