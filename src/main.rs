//! aoc-star-tracker entry point.
//!
//! Connects to the Discord gateway and runs the poll timer and command
//! dispatch on one loop.

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use aoc_star_tracker::aoc::AocClient;
use aoc_star_tracker::config::BotConfig;
use aoc_star_tracker::discord::{DiscordRest, Gateway, GatewayEvent};
use aoc_star_tracker::persistence::{JsonFileStore, SnapshotStore};
use aoc_star_tracker::service::{Tracker, dispatch};

/// Buffered gateway events before the reader waits on the loop.
const EVENT_BUFFER: usize = 64;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = BotConfig::from_env()?;
    tracing::info!(
        leaderboard = %config.leaderboard_id,
        year = config.aoc_year,
        channel = %config.channel_id,
        "starting aoc-star-tracker"
    );

    // Restore the last snapshot so a restart does not re-announce everyone
    let store = JsonFileStore::new(config.snapshot_path.clone());
    let stored = match store.load().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(error = %e, path = %store.path().display(), "ignoring stored snapshot");
            None
        }
    };

    // Build collaborators
    let source = AocClient::new(
        config.aoc_base_url.as_str(),
        config.aoc_year,
        config.session_cookie.as_str(),
    );
    let notifier = DiscordRest::new(config.discord_api_url.as_str(), config.discord_token.as_str());
    let mut tracker = Tracker::new(
        source,
        notifier,
        store,
        config.leaderboard_id.as_str(),
        config.channel_id.as_str(),
        stored,
    );

    // Start the gateway reader
    let (events_tx, mut events_rx) = mpsc::channel(EVENT_BUFFER);
    let gateway =
        Gateway::new(config.discord_token.as_str()).with_url(config.discord_gateway_url.as_str());
    let gateway_task = tokio::spawn(gateway.run(events_tx));

    let mut ticker = tokio::time::interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut bot_user_id: Option<String> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = tracker.run_cycle(Utc::now()).await {
                    tracing::error!(error = %e, kind = e.kind(), "scheduled poll failed");
                }
            }
            event = events_rx.recv() => match event {
                Some(GatewayEvent::Ready { user_id }) => {
                    tracing::info!(user = %user_id, "gateway ready");
                    bot_user_id = Some(user_id);
                }
                Some(GatewayEvent::Message(message)) => {
                    dispatch(&mut tracker, &message, bot_user_id.as_deref(), Utc::now()).await;
                }
                None => {
                    tracing::error!("gateway reader stopped");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                break;
            }
        }
    }

    gateway_task.abort();
    Ok(())
}
