//! Discord gateway session: the feed of incoming channel messages.
//!
//! A session connects, waits for HELLO, identifies, then heartbeats on the
//! interval the server asked for while forwarding READY and MESSAGE_CREATE
//! dispatches as [`GatewayEvent`]s. Any failure ends the session;
//! [`Gateway::run`] reconnects after a fixed delay until the receiving side
//! of the channel is dropped.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::error::TrackerError;

/// Default gateway endpoint (API v10, JSON encoding).
pub const DEFAULT_GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=10&encoding=json";

/// `GUILD_MESSAGES` intent bit.
pub const INTENT_GUILD_MESSAGES: u64 = 1 << 9;

/// `MESSAGE_CONTENT` intent bit.
pub const INTENT_MESSAGE_CONTENT: u64 = 1 << 15;

/// Delay before reconnecting after a session ends.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

const OP_DISPATCH: u8 = 0;
const OP_HEARTBEAT: u8 = 1;
const OP_IDENTIFY: u8 = 2;
const OP_RECONNECT: u8 = 7;
const OP_INVALID_SESSION: u8 = 9;
const OP_HELLO: u8 = 10;
const OP_HEARTBEAT_ACK: u8 = 11;

/// A message posted in a channel the bot can see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Id of the posting user.
    pub author_id: String,
    /// Channel the message was posted in.
    pub channel_id: String,
    /// Raw message text.
    pub content: String,
}

/// Events forwarded from the gateway to the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    /// Session established; carries the bot's own user id.
    Ready {
        /// The bot's user id.
        user_id: String,
    },
    /// A channel message was created.
    Message(IncomingMessage),
}

/// Raw gateway frame.
#[derive(Debug, Deserialize)]
struct Frame {
    op: u8,
    #[serde(default)]
    d: Value,
    #[serde(default)]
    s: Option<u64>,
    #[serde(default)]
    t: Option<String>,
}

/// Gateway connection settings.
#[derive(Clone)]
pub struct Gateway {
    url: String,
    token: String,
    intents: u64,
    reconnect_delay: Duration,
}

impl Gateway {
    /// Creates a gateway client listening for guild message content.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            url: DEFAULT_GATEWAY_URL.to_string(),
            token: token.into(),
            intents: INTENT_GUILD_MESSAGES | INTENT_MESSAGE_CONTENT,
            reconnect_delay: RECONNECT_DELAY,
        }
    }

    /// Overrides the gateway endpoint.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Overrides the pause between sessions.
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Keeps a session open, reconnecting after each failure.
    ///
    /// Returns once `events` has no receiver left.
    pub async fn run(self, events: mpsc::Sender<GatewayEvent>) {
        loop {
            match self.session(&events).await {
                Ok(()) => tracing::info!("gateway session closed"),
                Err(e) => tracing::warn!(error = %e, "gateway session failed"),
            }
            if events.is_closed() {
                break;
            }
            tokio::time::sleep(self.reconnect_delay).await;
            tracing::info!("reconnecting to gateway");
        }
    }

    /// Runs one session until the connection closes or fails.
    async fn session(&self, events: &mpsc::Sender<GatewayEvent>) -> Result<(), TrackerError> {
        let (stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| TrackerError::Gateway(format!("connect failed: {e}")))?;
        let (mut tx, mut rx) = stream.split();

        let heartbeat_every = loop {
            match rx.next().await {
                Some(Ok(Message::Text(text))) => {
                    let frame = decode_frame(text.as_str())?;
                    if frame.op == OP_HELLO {
                        break hello_interval(&frame)?;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(TrackerError::Gateway(format!("read failed: {e}"))),
                None => return Err(TrackerError::Gateway("closed before hello".to_string())),
            }
        };

        tx.send(Message::text(identify_payload(&self.token, self.intents).to_string()))
            .await
            .map_err(|e| TrackerError::Gateway(format!("identify failed: {e}")))?;
        tracing::debug!(interval = ?heartbeat_every, "identified with gateway");

        let mut heartbeat = interval_at(Instant::now() + heartbeat_every, heartbeat_every);
        let mut sequence: Option<u64> = None;
        let mut acked = true;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    if !acked {
                        return Err(TrackerError::Gateway("heartbeat not acknowledged".to_string()));
                    }
                    acked = false;
                    tx.send(Message::text(heartbeat_payload(sequence).to_string()))
                        .await
                        .map_err(|e| TrackerError::Gateway(format!("heartbeat failed: {e}")))?;
                }
                msg = rx.next() => {
                    let text = match msg {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Close(frame))) => {
                            tracing::info!(?frame, "gateway closed connection");
                            return Ok(());
                        }
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => {
                            return Err(TrackerError::Gateway(format!("read failed: {e}")));
                        }
                        None => return Ok(()),
                    };

                    let frame = decode_frame(text.as_str())?;
                    if frame.s.is_some() {
                        sequence = frame.s;
                    }
                    match frame.op {
                        OP_DISPATCH => {
                            if let Some(event) = parse_dispatch(&frame)
                                && events.send(event).await.is_err()
                            {
                                return Ok(());
                            }
                        }
                        OP_HEARTBEAT => {
                            tx.send(Message::text(heartbeat_payload(sequence).to_string()))
                                .await
                                .map_err(|e| {
                                    TrackerError::Gateway(format!("heartbeat failed: {e}"))
                                })?;
                        }
                        OP_HEARTBEAT_ACK => acked = true,
                        OP_RECONNECT => return Ok(()),
                        OP_INVALID_SESSION => {
                            return Err(TrackerError::Gateway("session invalidated".to_string()));
                        }
                        other => tracing::trace!(op = other, "ignoring gateway opcode"),
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("url", &self.url)
            .field("intents", &self.intents)
            .field("reconnect_delay", &self.reconnect_delay)
            .finish_non_exhaustive()
    }
}

fn decode_frame(text: &str) -> Result<Frame, TrackerError> {
    serde_json::from_str(text).map_err(|e| TrackerError::Gateway(format!("bad frame: {e}")))
}

fn hello_interval(frame: &Frame) -> Result<Duration, TrackerError> {
    frame
        .d
        .get("heartbeat_interval")
        .and_then(Value::as_u64)
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
        .ok_or_else(|| TrackerError::Gateway("hello without heartbeat interval".to_string()))
}

fn identify_payload(token: &str, intents: u64) -> Value {
    json!({
        "op": OP_IDENTIFY,
        "d": {
            "token": token,
            "intents": intents,
            "properties": {
                "os": std::env::consts::OS,
                "browser": env!("CARGO_PKG_NAME"),
                "device": env!("CARGO_PKG_NAME"),
            }
        }
    })
}

fn heartbeat_payload(sequence: Option<u64>) -> Value {
    json!({ "op": OP_HEARTBEAT, "d": sequence })
}

/// Extracts the events the bot cares about from a dispatch frame.
fn parse_dispatch(frame: &Frame) -> Option<GatewayEvent> {
    let field = |path: &[&str]| -> Option<String> {
        let mut value = &frame.d;
        for key in path {
            value = value.get(key)?;
        }
        value.as_str().map(str::to_string)
    };

    match frame.t.as_deref()? {
        "READY" => Some(GatewayEvent::Ready {
            user_id: field(&["user", "id"])?,
        }),
        "MESSAGE_CREATE" => Some(GatewayEvent::Message(IncomingMessage {
            author_id: field(&["author", "id"])?,
            channel_id: field(&["channel_id"])?,
            content: field(&["content"]).unwrap_or_default(),
        })),
        _ => None,
    }
}
