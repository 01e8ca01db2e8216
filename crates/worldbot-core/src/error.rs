//! Error types for the `worldbot-core` crate.
//!
//! Registry and parser failures surface as [`WaveError`]. Every variant is
//! meant to be echoed back to the chat as-is; none of them is fatal.
//! [`BotError`] wraps everything the message dispatcher can run into.

use crate::config::ConfigError;
use crate::schedule::ScheduleError;
use crate::votes::VoteError;

/// Errors raised by the wave registry and the update parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WaveError {
    /// The referenced world is not in the whitelist.
    #[error("World {0} is not a valid world")]
    InvalidWorld(String),

    /// A location argument is not `dwf`, `elm`, `rdi`, or `unk`.
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// A world count of zero (or something that is not a count).
    #[error("Invalid numworlds: {0}")]
    InvalidCount(String),

    /// A number in the command does not fit the expected range.
    #[error("Malformed number: {0}")]
    MalformedNumber(String),
}

impl WaveError {
    /// Shorthand for [`WaveError::InvalidWorld`] from a world number.
    pub fn invalid_world(number: u32) -> Self {
        Self::InvalidWorld(number.to_string())
    }
}

/// Errors raised while building or driving a [`crate::Bot`].
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Bad input from chat.
    #[error(transparent)]
    Wave(#[from] WaveError),

    /// Configuration could not be loaded or is inconsistent.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The wave timetable is invalid.
    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Vote counters could not be loaded or saved.
    #[error("vote error: {0}")]
    Votes(#[from] VoteError),
}
