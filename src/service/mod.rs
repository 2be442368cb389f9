//! Service layer: orchestration and command routing.
//!
//! [`Tracker`] coordinates polling, diffing and notification through its
//! injected collaborators; [`commands`] maps chat messages onto it.

pub mod commands;
pub mod tracker;

#[cfg(test)]
pub(crate) mod testing;

pub use commands::{Command, dispatch};
pub use tracker::{Tracker, TrackerState, UPDATE_COOLDOWN, UpdateOutcome};
