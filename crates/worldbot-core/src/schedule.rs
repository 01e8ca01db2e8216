//! Weekly wave timetable and next-wave computation.
//!
//! Waves start on the hour at fixed UTC hours that vary by weekday. The
//! console shim uses [`next_occurrence`] to decide how long to sleep before
//! firing the pre-wave reminder and the post-wave reset.

use chrono::{DateTime, Datelike, Days, TimeDelta, Utc, Weekday};
use chrono_tz::Tz;

use crate::config::ScheduleConfig;

/// Weekdays in the order [`ScheduleConfig::by_weekday`] lists them.
const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Errors that can occur while building a schedule.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// An hour outside `0..24`.
    #[error("wave hour {hour} on {weekday} is not in 0..24")]
    InvalidHour {
        /// Day the bad entry was listed under.
        weekday: Weekday,
        /// The offending hour.
        hour: u32,
    },
}

/// Validated weekly timetable: sorted, de-duplicated UTC hours per weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveSchedule {
    /// Monday first.
    hours: [Vec<u32>; 7],
}

impl WaveSchedule {
    /// Build a schedule from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidHour`] if any hour is 24 or more.
    pub fn from_config(config: &ScheduleConfig) -> Result<Self, ScheduleError> {
        for (weekday, hours) in WEEKDAYS.iter().zip(config.by_weekday()) {
            if let Some(&hour) = hours.iter().find(|&&h| h >= 24) {
                return Err(ScheduleError::InvalidHour {
                    weekday: *weekday,
                    hour,
                });
            }
        }
        let hours = config.by_weekday().map(|day| {
            let mut sorted = day.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            sorted
        });
        Ok(Self { hours })
    }

    /// Wave hours on `weekday`, ascending.
    pub fn hours_on(&self, weekday: Weekday) -> &[u32] {
        usize::try_from(weekday.num_days_from_monday())
            .ok()
            .and_then(|idx| self.hours.get(idx))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The first wave start strictly after `now`.
    ///
    /// Looks up to a week ahead; returns `None` only when the timetable is
    /// empty.
    pub fn next_occurrence(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = now.date_naive();
        for offset in 0..=7 {
            let date = today.checked_add_days(Days::new(offset))?;
            for &hour in self.hours_on(date.weekday()) {
                let start = date.and_hms_opt(hour, 0, 0)?.and_utc();
                if start > now {
                    return Some(start);
                }
            }
        }
        None
    }

    /// Time from `now` until the next wave start.
    pub fn time_until_next(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.next_occurrence(now)
            .map(|start| start.signed_duration_since(now))
    }
}

impl Default for WaveSchedule {
    fn default() -> Self {
        Self::from_config(&ScheduleConfig::default()).unwrap_or_else(|_err| Self {
            hours: Default::default(),
        })
    }
}

/// The first wave start in `schedule` strictly after `now`.
pub fn next_occurrence(schedule: &WaveSchedule, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule.next_occurrence(now)
}

/// Zones the `.wbs` reply lists, with the label shown for each.
const WAVE_TIME_ZONES: [(Tz, &str); 8] = [
    (chrono_tz::US::Eastern, "US/Eastern"),
    (chrono_tz::US::Central, "US/Central"),
    (chrono_tz::US::Pacific, "US/Pacific"),
    (chrono_tz::Europe::Paris, "EU/Central"),
    (chrono_tz::Europe::Sofia, "EU/Eastern"),
    (chrono_tz::Europe::London, "UK"),
    (chrono_tz::Singapore, "UTC+8"),
    (chrono_tz::Australia::Melbourne, "Australia/Eastern"),
];

/// Countdown text for the `.wbs` command: time left, then the start hour
/// in UTC and in each announced zone.
pub fn next_wave_info(schedule: &WaveSchedule, now: DateTime<Utc>) -> String {
    let Some(start) = schedule.next_occurrence(now) else {
        return "No waves are scheduled.".to_owned();
    };
    let total_minutes = start.signed_duration_since(now).num_minutes();
    let hours = total_minutes.checked_div(60).unwrap_or(0);
    let minutes = total_minutes.checked_rem(60).unwrap_or(0);

    let mut lines = vec![
        format!("{hours}:{minutes:02} until the next wave."),
        String::new(),
        "Next wave is at:".to_owned(),
        format!("{} in UTC", start.format("%H:00")),
    ];
    lines.extend(WAVE_TIME_ZONES.iter().map(|(zone, label)| {
        format!("{} in {label}", start.with_timezone(zone).format("%H:00"))
    }));
    lines.join("\n")
}
