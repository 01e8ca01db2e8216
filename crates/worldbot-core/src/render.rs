//! Status rendering for the `list` command.
//!
//! [`status_report`] builds named sections that map onto rich-embed fields;
//! [`render_status`] flattens them into plain markdown for text-only
//! platforms.

use std::fmt;

use worldbot_types::{Location, WbsTime, World, WorldState};

use crate::wave::Wave;

/// One named block of status output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSection {
    /// Section heading (`DWF`, `Dead`, `Active`, ...).
    pub name: String,
    /// Markdown body.
    pub value: String,
}

/// The full status view; empty sections are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    /// Sections in display order.
    pub sections: Vec<StatusSection>,
}

impl StatusReport {
    /// Whether there is nothing to show.
    pub const fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Look up a section by heading.
    pub fn section(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.value.as_str())
    }

    fn push(&mut self, name: &str, value: String) {
        if !value.is_empty() {
            self.sections.push(StatusSection {
                name: name.to_owned(),
                value,
            });
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sections.is_empty() {
            return f.write_str("No worlds called yet.");
        }
        for (idx, section) in self.sections.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            write!(f, "**{}**\n{}", section.name, section.value)?;
        }
        Ok(())
    }
}

/// Build the status view of `wave` at `now`.
///
/// Worlds with less than `short_minutes` left render struck through. The
/// caller is responsible for calling [`Wave::refresh_states`] first.
pub fn status_report(wave: &Wave, now: WbsTime, short_minutes: u32) -> StatusReport {
    let mut report = StatusReport::default();

    for location in Location::ALL {
        let entries: Vec<String> = wave
            .visible_worlds()
            .filter(|w| w.location == location && w.state != WorldState::Dead)
            .map(|w| world_marker(w, now, short_minutes))
            .collect();
        report.push(location.label(), entries.join(","));
    }

    let dead: Vec<String> = wave
        .visible_worlds()
        .filter(|w| w.state == WorldState::Dead)
        .map(|w| w.number.to_string())
        .collect();
    report.push("Dead", dead.join(","));

    let mut alive: Vec<&World> = wave
        .worlds()
        .filter(|w| w.state == WorldState::Alive)
        .collect();
    alive.sort_by(|a, b| b.time.cmp(&a.time).then(a.number.cmp(&b.number)));
    if !alive.is_empty() {
        let lines: Vec<String> = alive.iter().map(|w| detail_line(w, now)).collect();
        report.push("Active", format!("```\n{}\n```", lines.join("\n")));
    }

    report
}

/// Render the status view with the default three-minute threshold.
pub fn render_status(wave: &Wave, now: WbsTime) -> String {
    status_report(wave, now, 3).to_string()
}

/// World number decorated by state and remaining time.
fn world_marker(world: &World, now: WbsTime, short_minutes: u32) -> String {
    let mut marker = match (world.state, world.remaining_time(now)) {
        (WorldState::Beaming, _) => format!("*{}*", world.number),
        (_, None) => world.number.to_string(),
        (_, Some(left)) if left.minutes() >= short_minutes => format!("__{}__", world.number),
        (_, Some(_)) => format!("~~{}~~", world.number),
    };
    if world.suspicious {
        marker.push_str("\\*");
    }
    marker
}

/// One row of the active table.
fn detail_line(world: &World, now: WbsTime) -> String {
    let remaining = world
        .remaining_time(now)
        .map_or_else(|| "__:__".to_owned(), |t| t.to_string());
    let tents = world.tents.as_ref().map_or("   ", |t| t.as_str());
    let sus = if world.suspicious { '*' } else { ' ' };
    format!(
        "{:>3} {}{}: {} {} {}",
        world.number,
        world.location,
        sus,
        remaining,
        tents,
        world.notes.as_deref().unwrap_or_default(),
    )
}
