//! Error types for the console shim.

use worldbot_core::{BotError, ConfigError};

/// Errors that can stop the console shim.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// An environment variable is present but unusable.
    #[error("config error: {0}")]
    Config(String),

    /// `worldbot-config.yaml` could not be loaded.
    #[error(transparent)]
    BotConfig(#[from] ConfigError),

    /// The bot could not be built.
    #[error(transparent)]
    Bot(#[from] BotError),

    /// Reading stdin or writing stdout failed.
    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),
}
