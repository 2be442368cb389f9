//! Error types for the tracker and its collaborators.
//!
//! [`TrackerError`] is the central error type. Retrieval failures carry
//! only a message and are handled alike whatever their cause.

/// Configuration loading failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing or empty.
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    /// A variable is present but cannot be used.
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// Environment variable name.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Failures surfaced by the tracker and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The leaderboard could not be fetched or decoded.
    #[error("leaderboard retrieval failed: {0}")]
    Retrieval(String),

    /// A chat message could not be delivered.
    #[error("notification failed: {0}")]
    Notify(String),

    /// The snapshot could not be loaded or saved.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// The chat gateway connection failed.
    #[error("gateway error: {0}")]
    Gateway(String),

    /// Configuration is incomplete or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TrackerError {
    /// Returns a short, stable label for the error category.
    ///
    /// Used as a structured logging field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Retrieval(_) => "retrieval",
            Self::Notify(_) => "notify",
            Self::Persistence(_) => "persistence",
            Self::Gateway(_) => "gateway",
            Self::Config(_) => "config",
        }
    }
}
