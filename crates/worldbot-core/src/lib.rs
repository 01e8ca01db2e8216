//! Core logic for the warband worldbot.
//!
//! Scouts type free-text update lines; this crate turns them into
//! [`WorldUpdate`](worldbot_types::WorldUpdate)s, merges them into the
//! current [`Wave`], and renders the wave back as a status view.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration (`worldbot-config.yaml`)
//! - [`error`] -- [`WaveError`] and [`BotError`]
//! - [`wave`] -- the world registry and rosters
//! - [`parse`] -- the update line parser
//! - [`render`] -- status view rendering
//! - [`schedule`] -- weekly wave timetable
//! - [`votes`] -- good bot / bad bot counters
//! - [`commands`] -- dot-command parsing
//! - [`bot`] -- the message dispatcher platform shims call

pub mod bot;
pub mod commands;
pub mod config;
pub mod error;
pub mod parse;
pub mod render;
pub mod schedule;
pub mod votes;
pub mod wave;

pub use bot::{Author, Bot, Reply, VERSION};
pub use commands::{Command, DeadTarget};
pub use config::{BotConfig, ConfigError};
pub use error::{BotError, WaveError};
pub use parse::{parse_range, parse_update};
pub use render::{StatusReport, StatusSection, render_status, status_report};
pub use schedule::{ScheduleError, WaveSchedule, next_occurrence, next_wave_info};
pub use votes::{VoteError, VoteTally};
pub use wave::{TakeOutcome, Wave};
