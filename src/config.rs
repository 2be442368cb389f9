//! Bot configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Parsing goes through
//! [`BotConfig::from_lookup`] so it can run against any key source.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Datelike, Utc};

use crate::error::ConfigError;

/// First year Advent of Code ran.
pub const FIRST_EVENT_YEAR: i32 = 2015;

/// Default leaderboard API origin.
pub const DEFAULT_AOC_BASE_URL: &str = "https://adventofcode.com";

/// Default Discord REST API root.
pub const DEFAULT_DISCORD_API_URL: &str = "https://discord.com/api/v10";

/// Default Discord gateway endpoint.
pub const DEFAULT_DISCORD_GATEWAY_URL: &str = crate::discord::gateway::DEFAULT_GATEWAY_URL;

/// Top-level bot configuration.
///
/// Loaded once at startup via [`BotConfig::from_env`].
#[derive(Clone)]
pub struct BotConfig {
    /// Private leaderboard identifier.
    pub leaderboard_id: String,

    /// Advent of Code `session` cookie value.
    pub session_cookie: String,

    /// Discord bot token.
    pub discord_token: String,

    /// The one channel the bot listens to and posts in.
    pub channel_id: String,

    /// Event year whose leaderboard is tracked.
    pub aoc_year: i32,

    /// Interval between scheduled polls.
    pub poll_interval: Duration,

    /// Where the latest snapshot is persisted.
    pub snapshot_path: PathBuf,

    /// Leaderboard API origin, without trailing slash.
    pub aoc_base_url: String,

    /// Discord REST API root, without trailing slash.
    pub discord_api_url: String,

    /// Discord gateway websocket endpoint.
    pub discord_gateway_url: String,
}

impl BotConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if any of `LEADERBOARD_ID`,
    /// `SESSION_COOKIE`, `DISCORD_TOKEN` or `CHANNEL_ID` is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for absent required keys and
    /// [`ConfigError::Invalid`] for a zero poll interval.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let leaderboard_id = required("LEADERBOARD_ID")?;
        let session_cookie = required("SESSION_COOKIE")?;
        let discord_token = required("DISCORD_TOKEN")?;
        let channel_id = required("CHANNEL_ID")?;

        let current_year = Utc::now().year();
        let aoc_year = lookup("AOC_YEAR")
            .and_then(|v| v.trim().parse::<i32>().ok())
            .filter(|year| *year >= FIRST_EVENT_YEAR)
            .unwrap_or(current_year);

        let poll_interval_secs: u64 = parse_or("POLL_INTERVAL_SECS", &lookup, 900);
        if poll_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "POLL_INTERVAL_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let snapshot_path = lookup("SNAPSHOT_PATH")
            .map_or_else(|| PathBuf::from("leaderboard.json"), PathBuf::from);

        let aoc_base_url = lookup("AOC_BASE_URL")
            .unwrap_or_else(|| DEFAULT_AOC_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let discord_api_url = lookup("DISCORD_API_URL")
            .unwrap_or_else(|| DEFAULT_DISCORD_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let discord_gateway_url = lookup("DISCORD_GATEWAY_URL")
            .unwrap_or_else(|| DEFAULT_DISCORD_GATEWAY_URL.to_string());

        Ok(Self {
            leaderboard_id,
            session_cookie,
            discord_token,
            channel_id,
            aoc_year,
            poll_interval: Duration::from_secs(poll_interval_secs),
            snapshot_path,
            aoc_base_url,
            discord_api_url,
            discord_gateway_url,
        })
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("leaderboard_id", &self.leaderboard_id)
            .field("session_cookie", &"<redacted>")
            .field("discord_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("aoc_year", &self.aoc_year)
            .field("poll_interval", &self.poll_interval)
            .field("snapshot_path", &self.snapshot_path)
            .field("aoc_base_url", &self.aoc_base_url)
            .field("discord_api_url", &self.discord_api_url)
            .field("discord_gateway_url", &self.discord_gateway_url)
            .finish()
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
