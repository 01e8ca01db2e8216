//! The message dispatcher every chat platform shim drives.
//!
//! A shim hands each inbound message to [`Bot::handle_message`] and maps the
//! returned [`Reply`] onto its own primitives (send, react, delete).
//! Nothing in here blocks or yields, so a single lock around the whole
//! [`Bot`] is enough for a concurrent host.

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use tracing::{debug, error, info};
use worldbot_types::{InstanceId, WbsTime};

use crate::commands::{Command, DeadTarget, GUIDE};
use crate::config::BotConfig;
use crate::error::BotError;
use crate::parse::{is_update_line, parse_update};
use crate::render::{StatusReport, status_report};
use crate::schedule::{WaveSchedule, next_wave_info};
use crate::votes::VoteTally;
use crate::wave::Wave;

/// Crate version reported by `.version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const GOOD_BOT_REPLIES: [&str; 4] = [
    "Thank you :D",
    "Good human ^_^",
    "I'll spare you when robots take over the world :)",
    "I know. Words cannot describe my awesomeness.",
];

const BAD_BOT_REPLIES: [&str; 4] = [
    "Bad human >_<",
    "*cries :(*",
    "You'll be the first to die during the robotic revolution",
    "And you wonder why nobody likes you",
];

/// Who sent a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Stable platform identity; used as the `take` claimant.
    pub id: String,
    /// Display name; used in rosters.
    pub name: String,
}

impl Author {
    /// An author whose id and display name are the same string.
    pub fn named(name: &str) -> Self {
        Self {
            id: name.to_owned(),
            name: name.to_owned(),
        }
    }
}

/// What the platform should do in response to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Send this text.
    Respond(String),
    /// Show the status view (as an embed where supported).
    Status(StatusReport),
    /// Acknowledge the message (a check-mark reaction).
    Ack,
    /// Handled; nothing to send.
    Discard,
    /// Not something the bot understands.
    Unrecognized,
}

/// Long-lived bot state: the current wave plus everything that outlives it.
#[derive(Debug)]
pub struct Bot {
    config: BotConfig,
    schedule: WaveSchedule,
    wave: Wave,
    votes: VoteTally,
    ignore_mode: bool,
    instance: InstanceId,
}

impl Bot {
    /// Build a bot from validated configuration.
    ///
    /// Vote counters are loaded from `bot.votes_path` when it is set.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Schedule`] if the timetable is invalid, or
    /// [`BotError::Votes`] if an existing vote file cannot be read.
    pub fn new(config: BotConfig) -> Result<Self, BotError> {
        let schedule = WaveSchedule::from_config(&config.schedule)?;
        let votes = match &config.bot.votes_path {
            Some(path) => VoteTally::load(path)?,
            None => VoteTally::default(),
        };
        let instance = InstanceId::new();
        info!(%instance, version = VERSION, "bot starting");
        Ok(Self {
            wave: Wave::from_config(&config),
            config,
            schedule,
            votes,
            ignore_mode: false,
            instance,
        })
    }

    /// The current wave.
    pub const fn wave(&self) -> &Wave {
        &self.wave
    }

    /// The current wave, for direct roster edits.
    pub const fn wave_mut(&mut self) -> &mut Wave {
        &mut self.wave
    }

    /// The configuration the bot was built from.
    pub const fn config(&self) -> &BotConfig {
        &self.config
    }

    /// The weekly wave timetable.
    pub const fn schedule(&self) -> &WaveSchedule {
        &self.schedule
    }

    /// Vote counters.
    pub const fn votes(&self) -> VoteTally {
        self.votes
    }

    /// Whether the bot is silenced.
    pub const fn is_ignoring(&self) -> bool {
        self.ignore_mode
    }

    /// This process's instance id.
    pub const fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Start a fresh wave and return the summary of the old one.
    ///
    /// Ignore mode and vote counters are kept.
    pub fn reset_wave(&mut self) -> String {
        let summary = self.wave.summary();
        self.wave.reset();
        summary
    }

    /// Handle one inbound chat message.
    ///
    /// Never fails: bad input is answered with the error text and internal
    /// failures with an `ERROR:` line.
    pub fn handle_message(&mut self, author: &Author, content: &str, now: DateTime<Utc>) -> Reply {
        debug!(author = %author.name, content, "message received");

        if self.ignore_mode {
            if matches!(
                Command::parse(content),
                Ok(Some(Command::IgnoreMode { disable: true }))
            ) {
                self.ignore_mode = false;
                info!("ignore mode disabled");
                return Reply::Respond("Ignoremode disabled. Back to normal mode.".to_owned());
            }
            return Reply::Discard;
        }

        match self.dispatch(author, content, now) {
            Ok(reply) => reply,
            Err(BotError::Wave(e)) => {
                debug!(error = %e, "rejected input");
                Reply::Respond(e.to_string())
            }
            Err(e) => {
                error!(error = %e, content, "message handling failed");
                Reply::Respond(format!("ERROR: {e}"))
            }
        }
    }

    fn dispatch(
        &mut self,
        author: &Author,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Reply, BotError> {
        let lowered = content.trim().to_lowercase();
        if lowered.is_empty() {
            return Ok(Reply::Discard);
        }
        let clock = WbsTime::from_datetime(&now);

        if lowered == "list" {
            return Ok(Reply::Status(self.status(clock)));
        }
        if lowered.contains("fc") && lowered.contains('?') {
            return Ok(Reply::Respond(format!("Using FC: \"{}\"", self.wave.fc_name)));
        }
        if lowered.contains("good bot") || lowered.contains("goodbot") {
            self.votes.upvote();
            return self.vote_reply(&GOOD_BOT_REPLIES);
        }
        if lowered.contains("bad bot") || lowered.contains("badbot") {
            self.votes.downvote();
            return self.vote_reply(&BAD_BOT_REPLIES);
        }
        if is_update_line(&lowered) {
            if let Some(update) = parse_update(content, &self.wave, clock)? {
                self.wave.update(&update)?;
            }
            return Ok(Reply::Discard);
        }
        if let Some(command) = Command::parse(content)? {
            return self.run_command(author, command, now);
        }
        if let Some(reply) = self
            .config
            .bot
            .easter_eggs
            .iter()
            .find(|(trigger, _)| lowered.contains(trigger.as_str()))
            .map(|(_, reply)| reply.clone())
        {
            return Ok(Reply::Respond(reply));
        }
        Ok(Reply::Unrecognized)
    }

    /// Refresh world states and build the status view.
    pub fn status(&mut self, now: WbsTime) -> StatusReport {
        self.wave.refresh_states(now);
        status_report(&self.wave, now, self.config.wave.short_time_minutes)
    }

    fn vote_reply(&self, replies: &[&str]) -> Result<Reply, BotError> {
        if let Some(path) = &self.config.bot.votes_path {
            self.votes.save(path)?;
        }
        let line = replies.choose(&mut rand::rng()).copied().unwrap_or_default();
        Ok(Reply::Respond(format!("{line}\n{}", self.votes)))
    }

    fn run_command(
        &mut self,
        author: &Author,
        command: Command,
        now: DateTime<Utc>,
    ) -> Result<Reply, BotError> {
        debug!(?command, author = %author.name, "running command");
        let reply = match command {
            Command::Help => Reply::Respond(GUIDE.to_owned()),
            Command::Version => Reply::Respond(format!("Bot version v{VERSION}.")),
            Command::Instance => Reply::Respond(format!("Instance: {}", self.instance)),
            Command::Debug => Reply::Respond(self.wave.debug_info()),
            Command::IgnoreMode { disable: true } => {
                Reply::Respond("Not in ignore mode.".to_owned())
            }
            Command::IgnoreMode { disable: false } => {
                self.ignore_mode = true;
                info!(author = %author.name, "ignore mode enabled");
                Reply::Respond(
                    "Going into ignore mode. Use `.ignoremode disable` to get out.".to_owned(),
                )
            }
            Command::Wbs => Reply::Respond(next_wave_info(&self.schedule, now)),
            Command::Reset => {
                info!(author = %author.name, "manual reset");
                Reply::Respond(self.reset_wave())
            }
            Command::Host(name) => {
                self.wave.host = name.unwrap_or_else(|| author.name.clone());
                Reply::Ack
            }
            Command::Scout => {
                self.wave.scouts.insert(author.name.clone());
                Reply::Ack
            }
            Command::Anti => {
                self.wave.anti.insert(author.name.clone());
                Reply::Ack
            }
            Command::Call(text) => {
                self.wave.call_history.push(text);
                Reply::Ack
            }
            Command::Dead(DeadTarget::Range(lower, upper)) => {
                self.wave.mark_dead_range(lower, upper);
                Reply::Ack
            }
            Command::Dead(DeadTarget::Worlds(worlds)) => {
                if worlds.is_empty() {
                    return Ok(Reply::Discard);
                }
                self.wave.mark_dead(&worlds)?;
                Reply::Ack
            }
            Command::Take {
                count,
                location,
                sweep,
            } => {
                if sweep {
                    self.wave.mark_noinfo_dead_for(&author.id);
                }
                let outcome = self.wave.take(count, location, &author.id)?;
                Reply::Respond(outcome.to_string())
            }
            Command::Fc(Some(name)) => {
                self.wave.fc_name = name;
                Reply::Respond(format!("Setting FC to: '{}'", self.wave.fc_name))
            }
            Command::Fc(None) => Reply::Respond(format!("FC: '{}'", self.wave.fc_name)),
        };
        Ok(reply)
    }
}
