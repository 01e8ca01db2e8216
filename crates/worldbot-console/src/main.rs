//! Console entry point for the warband worldbot.
//!
//! Stands in for a chat platform: every stdin line is a message, every reply
//! is printed to stdout, and the reminder and autoreset timers run alongside
//! exactly as they would next to a real chat connection.
//!
//! # Architecture
//!
//! ```text
//! stdin --> shell --+
//!                   +--> Mutex<Bot> --> outbox --> stdout
//! timers -----------+
//! ```
//!
//! The bot sits behind one `tokio::sync::Mutex`; each message and each timer
//! action holds it for the whole operation.

mod config;
mod error;
mod shell;
mod tasks;

use std::path::Path;
use std::sync::Arc;

use tokio::io::BufReader;
use tokio::sync::{Mutex, mpsc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use worldbot_core::{Bot, BotConfig};

use crate::config::ConsoleConfig;
use crate::error::ConsoleError;

/// The bot as shared between the shell and the timer tasks.
type SharedBot = Arc<Mutex<Bot>>;

/// Application entry point.
///
/// Loads configuration, initializes logging, builds the bot, starts the
/// timer tasks, and reads stdin until EOF or `.quit`.
///
/// # Errors
///
/// Returns an error if configuration is invalid or stdin cannot be read.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConsoleConfig::from_env()?;

    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("worldbot-console starting");
    info!(
        config_path = %config.config_path.display(),
        user = %config.user,
        reset_delay_mins = config.reset_delay.num_minutes(),
        notify_lead_mins = config.notify_lead.num_minutes(),
        "configuration loaded"
    );

    let bot_config = load_bot_config(&config.config_path)?;
    let bot: SharedBot = Arc::new(Mutex::new(Bot::new(bot_config)?));

    let (outbox, mut replies) = mpsc::unbounded_channel::<String>();
    let printer = tokio::spawn(async move {
        while let Some(text) = replies.recv().await {
            println!("{text}\n");
        }
    });
    let reset_task = tokio::spawn(tasks::autoreset(Arc::clone(&bot), config.reset_delay));
    let notify_task = tokio::spawn(tasks::notify(
        Arc::clone(&bot),
        config.notify_lead,
        outbox.clone(),
    ));

    info!("bot ready, reading stdin");
    let stdin = BufReader::new(tokio::io::stdin());
    shell::run(Arc::clone(&bot), stdin, &config.user, outbox).await?;

    reset_task.abort();
    notify_task.abort();
    if let Err(e) = printer.await {
        warn!(error = %e, "output task ended abnormally");
    }

    info!("worldbot-console stopped");
    Ok(())
}

/// Load the YAML bot configuration, or the defaults if the file is absent.
fn load_bot_config(path: &Path) -> Result<BotConfig, ConsoleError> {
    if path.exists() {
        Ok(BotConfig::from_file(path)?)
    } else {
        warn!(path = %path.display(), "config file not found, using defaults");
        Ok(BotConfig::default())
    }
}
