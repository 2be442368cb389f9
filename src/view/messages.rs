//! Fixed chat notices.

/// Announcement sent once before the list of new members.
pub const NEW_MEMBERS_ANNOUNCEMENT: &str = "CHALLENGER APPROACHING!";

/// Reply to a manual update that found nothing new.
pub const NO_UPDATES: &str = "No updates";

/// Reply to a manual update inside the cool-down window.
pub const COOLDOWN_NOTICE: &str = "You can only update once every 15 minutes";

/// Reply when a manual update fails.
pub const UPDATE_FAILED: &str = "Something went wrong while checking the leaderboard";

/// Notification for a participant who earned a star.
#[must_use]
pub fn new_star(name: &str) -> String {
    format!("{name} got a star! 🌟")
}

/// Notification for a participant who joined the leaderboard.
#[must_use]
pub fn new_member(name: &str) -> String {
    format!("{name} has joined the leaderboard!")
}

/// Command listing, wrapped in a code block.
#[must_use]
pub fn help_text() -> String {
    [
        "```Commands:",
        "",
        "!leaderboard - Shows the current leaderboard",
        "",
        "!update - Checks for updates and shows the updated leaderboard",
        "",
        "!stars - Shows the current stars",
        "",
        "!help - Shows this message",
        "```",
    ]
    .join("\n")
}
