//! # aoc-star-tracker
//!
//! Chat bot that watches a private Advent of Code leaderboard and posts
//! progress to a single Discord channel.
//!
//! The bot polls the leaderboard on a fixed schedule, compares each new
//! snapshot with the previous one, and announces new stars and new
//! members. Users can ask for the scoreboard, the star grid, or a manual
//! update (rate limited to one every 15 minutes).
//!
//! ## Architecture
//!
//! ```text
//! Discord gateway (discord/)      poll timer
//!     │                               │
//!     ├── Command dispatch (service/) │
//!     │                               │
//!     └──────── Tracker (service/) ───┘
//!                   │
//!     ├── AocClient (aoc/)
//!     ├── Differ (domain/)
//!     ├── Presenter (view/)
//!     ├── DiscordRest (discord/)
//!     │
//!     └── JSON snapshot file (persistence/)
//! ```

pub mod aoc;
pub mod config;
pub mod discord;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod view;
