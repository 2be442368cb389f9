//! Discord REST client for posting channel messages.

use async_trait::async_trait;
use serde_json::json;

use super::Notifier;
use crate::error::TrackerError;
use crate::view::Embed;

/// Posts messages through `POST /channels/{id}/messages`.
#[derive(Clone)]
pub struct DiscordRest {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl DiscordRest {
    /// Creates a client for the API rooted at `api_url`.
    #[must_use]
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            token: token.into(),
        }
    }

    async fn post_message(
        &self,
        channel_id: &str,
        body: serde_json::Value,
    ) -> Result<(), TrackerError> {
        let url = format!("{}/channels/{channel_id}/messages", self.api_url);
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
            .json(&body)
            .send()
            .await
            .map_err(|e| TrackerError::Notify(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TrackerError::Notify(format!("unexpected status {status}: {detail}")));
        }
        Ok(())
    }
}

impl std::fmt::Debug for DiscordRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordRest")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for DiscordRest {
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<(), TrackerError> {
        self.post_message(channel_id, json!({ "content": text })).await
    }

    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<(), TrackerError> {
        self.post_message(channel_id, json!({ "embeds": [embed] })).await
    }
}
