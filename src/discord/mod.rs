//! Discord integration: outgoing messages and the incoming command feed.
//!
//! [`Notifier`] is the seam the tracker sends through; [`DiscordRest`]
//! implements it over the REST API. [`gateway`] keeps a websocket session
//! open and forwards channel messages to the dispatch loop.

pub mod gateway;
pub mod rest;

use async_trait::async_trait;

use crate::error::TrackerError;
use crate::view::Embed;

pub use gateway::{Gateway, GatewayEvent, IncomingMessage};
pub use rest::DiscordRest;

/// Delivers messages to a chat channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a plain text message.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Notify`] if the message was not accepted.
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<(), TrackerError>;

    /// Sends a rich embed.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Notify`] if the message was not accepted.
    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<(), TrackerError>;
}
