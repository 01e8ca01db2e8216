//! Periodic wave tasks: the pre-wave reminder and the post-wave reset.
//!
//! Both loops compute the next firing instant from the wave timetable, sleep
//! until then, and take the bot lock only for the action itself.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{Mutex, mpsc};
use tracing::{info, warn};
use worldbot_core::{Bot, WaveSchedule};

use crate::SharedBot;

/// When the registry should next be reset: `delay` after the first wave
/// whose reset is still ahead of `now`.
pub fn next_reset_at(
    schedule: &WaveSchedule,
    now: DateTime<Utc>,
    delay: TimeDelta,
) -> Option<DateTime<Utc>> {
    let since = now.checked_sub_signed(delay)?;
    schedule.next_occurrence(since)?.checked_add_signed(delay)
}

/// When the next reminder is due, paired with the wave it announces.
pub fn next_reminder_at(
    schedule: &WaveSchedule,
    now: DateTime<Utc>,
    lead: TimeDelta,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let wave = schedule.next_occurrence(now.checked_add_signed(lead)?)?;
    Some((wave.checked_sub_signed(lead)?, wave))
}

/// Non-negative wall-clock distance from `now` to `at`.
pub fn sleep_duration(now: DateTime<Utc>, at: DateTime<Utc>) -> Duration {
    at.signed_duration_since(now).to_std().unwrap_or(Duration::ZERO)
}

/// Reminder text for the wave starting at `wave_start`.
pub fn reminder_text(schedule: &WaveSchedule, wave_start: DateTime<Utc>, lead: TimeDelta) -> String {
    let mut text = format!(
        "Wave in {} minutes (<t:{}:F>). Join the fc and voice.",
        lead.num_minutes(),
        wave_start.timestamp(),
    );
    if let Some(following) = schedule.next_occurrence(wave_start) {
        let ts = following.timestamp();
        text.push_str(&format!("\nThe following wave is <t:{ts}:R> at <t:{ts}:F>."));
    }
    text
}

/// Reset the wave and return the summary of the one that ended.
pub async fn reset_now(bot: &Mutex<Bot>) -> String {
    bot.lock().await.reset_wave()
}

/// The reminder to post, or `None` while the bot is in ignore mode.
pub async fn reminder_for(
    bot: &Mutex<Bot>,
    wave_start: DateTime<Utc>,
    lead: TimeDelta,
) -> Option<String> {
    let bot = bot.lock().await;
    (!bot.is_ignoring()).then(|| reminder_text(bot.schedule(), wave_start, lead))
}

/// Reset the registry `delay` after every wave, forever.
pub async fn autoreset(bot: SharedBot, delay: TimeDelta) {
    let schedule = bot.lock().await.schedule().clone();
    loop {
        let now = Utc::now();
        let Some(at) = next_reset_at(&schedule, now, delay) else {
            warn!("no waves scheduled, autoreset disabled");
            return;
        };
        let wait = sleep_duration(now, at);
        info!(at = %at, wait_secs = wait.as_secs(), "autoreset scheduled");
        tokio::time::sleep(wait).await;

        let summary = reset_now(&bot).await;
        info!(%summary, "auto reset triggered");
    }
}

/// Post a reminder `lead` before every wave, forever.
pub async fn notify(bot: SharedBot, lead: TimeDelta, outbox: mpsc::UnboundedSender<String>) {
    let schedule = bot.lock().await.schedule().clone();
    loop {
        let now = Utc::now();
        let Some((at, wave_start)) = next_reminder_at(&schedule, now, lead) else {
            warn!("no waves scheduled, reminders disabled");
            return;
        };
        let wait = sleep_duration(now, at);
        info!(at = %at, wait_secs = wait.as_secs(), "next wave reminder scheduled");
        tokio::time::sleep(wait).await;

        match reminder_for(&bot, wave_start, lead).await {
            Some(text) => {
                if outbox.send(text).is_err() {
                    info!("output closed, stopping reminders");
                    return;
                }
            }
            None => info!("ignore mode, reminder skipped"),
        }
    }
}
