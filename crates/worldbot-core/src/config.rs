//! Configuration loading and typed config structures for the worldbot.
//!
//! The canonical configuration lives in `worldbot-config.yaml` at the
//! project root. Every field has a default matching the live bot, so an
//! empty file (or no file at all) yields a working configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::schedule::WaveSchedule;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but is inconsistent.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level bot configuration.
///
/// Mirrors the structure of `worldbot-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BotConfig {
    /// Which world numbers exist and which are hidden.
    #[serde(default)]
    pub worlds: WorldsConfig,

    /// Per-wave defaults and rendering thresholds.
    #[serde(default)]
    pub wave: WaveConfig,

    /// Weekly wave timetable (UTC hours).
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Chat behaviour: vote persistence and canned replies.
    #[serde(default)]
    pub bot: BehaviourConfig,
}

impl BotConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// `WORLDBOT_VOTES_PATH` overrides `bot.votes_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.bot.apply_env_overrides();
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the whitelist is empty, a hidden
    /// world is not whitelisted, or the schedule contains an invalid hour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worlds.valid.is_empty() {
            return Err(ConfigError::Invalid {
                reason: "worlds.valid must list at least one world".to_owned(),
            });
        }
        if let Some(stray) = self
            .worlds
            .hidden
            .iter()
            .find(|n| !self.worlds.valid.contains(*n))
        {
            return Err(ConfigError::Invalid {
                reason: format!("hidden world {stray} is not in worlds.valid"),
            });
        }
        WaveSchedule::from_config(&self.schedule).map_err(|e| ConfigError::Invalid {
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

/// World whitelist configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldsConfig {
    /// Every world number the bot accepts.
    #[serde(default = "default_valid_worlds")]
    pub valid: Vec<u32>,

    /// Worlds that are tracked but left out of the default status view
    /// (legacy, skill-restricted, and foreign-language worlds).
    #[serde(default = "default_hidden_worlds")]
    pub hidden: Vec<u32>,
}

impl Default for WorldsConfig {
    fn default() -> Self {
        Self {
            valid: default_valid_worlds(),
            hidden: default_hidden_worlds(),
        }
    }
}

/// Per-wave configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WaveConfig {
    /// In-game friends chat everyone joins; restored on every reset.
    #[serde(default = "default_fc")]
    pub default_fc: String,

    /// Worlds with less than this many minutes left render struck through.
    #[serde(default = "default_short_time_minutes")]
    pub short_time_minutes: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            default_fc: default_fc(),
            short_time_minutes: default_short_time_minutes(),
        }
    }
}

/// Weekly wave timetable. Each list holds the UTC hours a wave starts on
/// that weekday.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleConfig {
    /// Wave hours on Monday.
    #[serde(default = "default_monday")]
    pub monday: Vec<u32>,
    /// Wave hours on Tuesday.
    #[serde(default = "default_tuesday")]
    pub tuesday: Vec<u32>,
    /// Wave hours on Wednesday.
    #[serde(default = "default_wednesday")]
    pub wednesday: Vec<u32>,
    /// Wave hours on Thursday.
    #[serde(default = "default_thursday")]
    pub thursday: Vec<u32>,
    /// Wave hours on Friday.
    #[serde(default = "default_friday")]
    pub friday: Vec<u32>,
    /// Wave hours on Saturday.
    #[serde(default = "default_saturday")]
    pub saturday: Vec<u32>,
    /// Wave hours on Sunday.
    #[serde(default = "default_sunday")]
    pub sunday: Vec<u32>,
}

impl ScheduleConfig {
    /// Hours for each weekday, Monday first.
    pub fn by_weekday(&self) -> [&[u32]; 7] {
        [
            self.monday.as_slice(),
            self.tuesday.as_slice(),
            self.wednesday.as_slice(),
            self.thursday.as_slice(),
            self.friday.as_slice(),
            self.saturday.as_slice(),
            self.sunday.as_slice(),
        ]
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            monday: default_monday(),
            tuesday: default_tuesday(),
            wednesday: default_wednesday(),
            thursday: default_thursday(),
            friday: default_friday(),
            saturday: default_saturday(),
            sunday: default_sunday(),
        }
    }
}

/// Chat behaviour configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BehaviourConfig {
    /// Where the good bot / bad bot counters are persisted. `None` keeps
    /// them in memory only.
    #[serde(default)]
    pub votes_path: Option<PathBuf>,

    /// Substring triggers and their canned replies.
    #[serde(default = "default_easter_eggs")]
    pub easter_eggs: BTreeMap<String, String>,
}

impl BehaviourConfig {
    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("WORLDBOT_VOTES_PATH") {
            self.votes_path = Some(PathBuf::from(path));
        }
    }
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            votes_path: None,
            easter_eggs: default_easter_eggs(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_valid_worlds() -> Vec<u32> {
    vec![
        1, 2, 4, 5, 6, 9, 10, 12, 14, 15, 16, 18, 21, 22, 23, 24, 25, 26, 27, 28, 30, 31, 32, 35,
        36, 37, 39, 40, 42, 44, 45, 46, 47, 48, 49, 50, 51, 52, 53, 54, 56, 58, 59, 60, 62, 63, 64,
        65, 66, 67, 68, 69, 70, 71, 72, 73, 74, 75, 76, 77, 78, 79, 82, 83, 84, 85, 86, 87, 88, 89,
        91, 92, 96, 97, 98, 99, 100, 102, 103, 104, 105, 106, 114, 115, 116, 117, 118, 119, 121,
        123, 124, 134, 137, 138, 139, 140, 252, 257, 258, 259,
    ]
}

fn default_hidden_worlds() -> Vec<u32> {
    // legacy; skill/vip restricted; portuguese; german; french
    vec![18, 97, 115, 137, 48, 52, 47, 75, 102, 121, 118]
}

fn default_fc() -> String {
    "Wbs United".to_owned()
}

const fn default_short_time_minutes() -> u32 {
    3
}

fn default_monday() -> Vec<u32> {
    vec![2, 9, 16, 23]
}

fn default_tuesday() -> Vec<u32> {
    vec![6, 13, 20]
}

fn default_wednesday() -> Vec<u32> {
    vec![3, 10, 17]
}

fn default_thursday() -> Vec<u32> {
    vec![0, 7, 14, 21]
}

fn default_friday() -> Vec<u32> {
    vec![4, 11, 18]
}

fn default_saturday() -> Vec<u32> {
    vec![1, 8, 15, 22]
}

fn default_sunday() -> Vec<u32> {
    vec![5, 12, 19]
}

fn default_easter_eggs() -> BTreeMap<String, String> {
    [
        (".wbu", "75/75 or silently refunds you"),
        (".sever", "Who is sever squad?"),
        (".lat", "Who?"),
        (".rpk", "Who?"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect()
}
