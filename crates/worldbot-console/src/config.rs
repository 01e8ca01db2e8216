//! Runtime settings for the console shim.
//!
//! Everything comes from environment variables. Bot behaviour itself lives in
//! `worldbot-config.yaml`; these settings only cover how the shim runs.

use std::path::PathBuf;

use chrono::TimeDelta;

use crate::error::ConsoleError;

/// Complete console configuration loaded from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Path to the YAML bot configuration.
    pub config_path: PathBuf,
    /// Display name used for stdin messages until `.as` switches it.
    pub user: String,
    /// Verbose logging when no `RUST_LOG` is set.
    pub debug: bool,
    /// How long after a wave starts the registry is reset.
    pub reset_delay: TimeDelta,
    /// How long before a wave starts the reminder is sent.
    pub notify_lead: TimeDelta,
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `WORLDBOT_CONFIG` -- bot config path (default `worldbot-config.yaml`)
    /// - `WORLDBOT_USER` -- console display name (default `console`)
    /// - `WORLDBOT_DEBUG` -- any value enables debug logging
    /// - `WORLDBOT_RESET_DELAY_MINS` -- minutes after a wave to reset (default 60)
    /// - `WORLDBOT_NOTIFY_LEAD_MINS` -- minutes before a wave to remind (default 15)
    pub fn from_env() -> Result<Self, ConsoleError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConsoleError> {
        let config_path = lookup("WORLDBOT_CONFIG")
            .map_or_else(|| PathBuf::from("worldbot-config.yaml"), PathBuf::from);
        let user = lookup("WORLDBOT_USER").unwrap_or_else(|| "console".to_owned());
        let debug = lookup("WORLDBOT_DEBUG").is_some();
        let reset_delay = minutes_var(&lookup, "WORLDBOT_RESET_DELAY_MINS", 60)?;
        let notify_lead = minutes_var(&lookup, "WORLDBOT_NOTIFY_LEAD_MINS", 15)?;

        Ok(Self {
            config_path,
            user,
            debug,
            reset_delay,
            notify_lead,
        })
    }
}

/// Read a whole-minutes variable, falling back to `default`.
fn minutes_var(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: i64,
) -> Result<TimeDelta, ConsoleError> {
    let minutes: i64 = match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConsoleError::Config(format!("invalid {name}: {e}")))?,
        None => default,
    };
    if minutes < 0 {
        return Err(ConsoleError::Config(format!("{name} must not be negative")));
    }
    TimeDelta::try_minutes(minutes)
        .ok_or_else(|| ConsoleError::Config(format!("{name} is out of range")))
}
