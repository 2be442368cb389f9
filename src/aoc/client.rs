//! HTTP client for the private leaderboard API.

use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, USER_AGENT};

use super::LeaderboardSource;
use crate::domain::Snapshot;
use crate::error::TrackerError;

const USER_AGENT_VALUE: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " (private leaderboard announcer)"
);

/// Authenticated client for one event year.
#[derive(Clone)]
pub struct AocClient {
    http: reqwest::Client,
    base_url: String,
    year: i32,
    session_cookie: String,
}

impl AocClient {
    /// Creates a client for `year`, authenticating with `session_cookie`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, year: i32, session_cookie: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            year,
            session_cookie: session_cookie.into(),
        }
    }

    /// Endpoint URL for `leaderboard_id`.
    #[must_use]
    pub fn leaderboard_url(&self, leaderboard_id: &str) -> String {
        format!(
            "{}/{}/leaderboard/private/view/{leaderboard_id}.json",
            self.base_url, self.year
        )
    }

    fn headers(&self) -> Result<HeaderMap, TrackerError> {
        let cookie = HeaderValue::from_str(&format!("session={}", self.session_cookie))
            .map_err(|e| TrackerError::Retrieval(format!("invalid session cookie: {e}")))?;
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(COOKIE, cookie);
        Ok(headers)
    }
}

impl std::fmt::Debug for AocClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AocClient")
            .field("base_url", &self.base_url)
            .field("year", &self.year)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LeaderboardSource for AocClient {
    async fn fetch(&self, leaderboard_id: &str) -> Result<Snapshot, TrackerError> {
        let url = self.leaderboard_url(leaderboard_id);
        tracing::debug!(%url, "fetching leaderboard");

        let response = self
            .http
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| TrackerError::Retrieval(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Retrieval(format!("unexpected status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TrackerError::Retrieval(format!("reading body failed: {e}")))?;

        // An expired session redirects to the login page, which is HTML.
        serde_json::from_slice::<Snapshot>(&body)
            .map_err(|e| TrackerError::Retrieval(format!("decoding leaderboard failed: {e}")))
    }
}
