//! Stdin shell: each input line is a chat message.
//!
//! Two lines are handled by the shell itself: `.as <name>` switches the
//! speaking user and `.quit` ends the session.

use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;
use worldbot_core::{Author, Reply};

use crate::SharedBot;
use crate::error::ConsoleError;

/// Text printed for an acknowledged command.
const ACK: &str = "\u{2705}";

/// What the console prints for a reply, if anything.
pub fn render_reply(reply: Reply) -> Option<String> {
    match reply {
        Reply::Respond(text) => Some(text),
        Reply::Status(report) => Some(report.to_string()),
        Reply::Ack => Some(ACK.to_owned()),
        Reply::Discard | Reply::Unrecognized => None,
    }
}

/// Feed every line of `input` to the bot until EOF or `.quit`.
pub async fn run<R>(
    bot: SharedBot,
    input: R,
    user: &str,
    outbox: mpsc::UnboundedSender<String>,
) -> Result<(), ConsoleError>
where
    R: AsyncBufRead + Unpin,
{
    let mut author = Author::named(user);
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed == ".quit" {
            break;
        }
        if let Some(name) = trimmed.strip_prefix(".as ") {
            author = Author::named(name.trim());
            debug!(user = %author.name, "switched console user");
            continue;
        }

        let reply = bot.lock().await.handle_message(&author, &line, Utc::now());
        debug!(?reply, "reply");
        if let Some(text) = render_reply(reply) {
            if outbox.send(text).is_err() {
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::Mutex;
    use worldbot_core::{Bot, BotConfig, StatusReport};

    use super::*;

    fn shared_bot() -> SharedBot {
        Arc::new(Mutex::new(Bot::new(BotConfig::default()).unwrap()))
    }

    async fn session(bot: SharedBot, script: &str) -> Vec<String> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        run(bot, script.as_bytes(), "alice", tx).await.unwrap();
        let mut out = Vec::new();
        while let Some(line) = rx.recv().await {
            out.push(line);
        }
        out
    }

    #[test]
    fn reply_rendering() {
        assert_eq!(render_reply(Reply::Ack).as_deref(), Some(ACK));
        assert_eq!(render_reply(Reply::Discard), None);
        assert_eq!(render_reply(Reply::Unrecognized), None);
        assert_eq!(
            render_reply(Reply::Status(StatusReport::default())).as_deref(),
            Some("No worlds called yet.")
        );
    }

    #[tokio::test]
    async fn lines_are_dispatched_as_the_current_user() {
        let bot = shared_bot();
        let out = session(bot.clone(), ".host\n.as bob\n.scout\n.t 2\nwhat fc?\n").await;
        assert_eq!(out, vec![ACK, ACK, "1, 2", "Using FC: \"Wbs United\""]);

        let bot = bot.lock().await;
        assert_eq!(bot.wave().host, "alice");
        assert!(bot.wave().scouts.contains("bob"));
        assert_eq!(bot.wave().get(1).unwrap().assigned.as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn quit_stops_reading() {
        let bot = shared_bot();
        let out = session(bot.clone(), ".quit\n.host\n").await;
        assert!(out.is_empty());
        assert!(bot.lock().await.wave().host.is_empty());
    }
}
