//! Presentation layer: chat-ready renderings of a snapshot.
//!
//! Renderers are pure functions returning an [`Embed`] (a titled, colored
//! block of text) or `None` when there is nothing to show. The fixed
//! notification strings live in [`messages`].

pub mod messages;
pub mod scoreboard;
pub mod stars;

use serde::Serialize;

pub use scoreboard::render_scoreboard;
pub use stars::render_stars;

/// Structured rich message: title, body text and accent color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    /// Heading shown above the body.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Accent color as `0xRRGGBB`.
    pub color: u32,
}

impl Embed {
    /// Creates a new embed.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color,
        }
    }
}
