//! Core entity structs: tracked worlds and partial updates to them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::{Location, WorldState};
use crate::time::WbsTime;

// ---------------------------------------------------------------------------
// Tents
// ---------------------------------------------------------------------------

/// Letters that may appear in a tents code: herblore, construction, mining,
/// farming, smithing.
pub const TENT_CODES: &str = "mhcsf";

/// Which resource tents stand at a camp, as a 3-letter code such as `hcf`.
///
/// The code is kept verbatim; no sorting or de-duplication is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tents(String);

impl Tents {
    /// Length of every tents code.
    pub const LEN: usize = 3;

    /// Accept `code` if it is exactly three tent letters.
    pub fn parse(code: &str) -> Option<Self> {
        let valid = code.chars().count() == Self::LEN && code.chars().all(|c| TENT_CODES.contains(c));
        valid.then(|| Self(code.to_owned()))
    }

    /// The code as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// WorldUpdate
// ---------------------------------------------------------------------------

/// A partial update to one world, produced by the command parser.
///
/// Every field starts unset. Only set fields are merged into the target
/// world, so an update can never clear a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldUpdate {
    /// Target world number.
    pub number: u32,
    /// New location.
    pub location: Option<Location>,
    /// New lifecycle state.
    pub state: Option<WorldState>,
    /// New tents code.
    pub tents: Option<Tents>,
    /// New estimated death time.
    pub time: Option<WbsTime>,
    /// New free-text notes.
    pub notes: Option<String>,
    /// Marks the world as suspicious when `true`; `false` means unset.
    pub suspicious: bool,
}

impl WorldUpdate {
    /// An update for `number` with nothing set.
    pub const fn new(number: u32) -> Self {
        Self {
            number,
            location: None,
            state: None,
            tents: None,
            time: None,
            notes: None,
            suspicious: false,
        }
    }

    /// Whether any field is set.
    pub const fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.state.is_none()
            && self.tents.is_none()
            && self.time.is_none()
            && self.notes.is_none()
            && !self.suspicious
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Everything known about one world during the current wave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    /// World number, always one of the whitelisted worlds.
    pub number: u32,
    /// Camp location.
    pub location: Location,
    /// Lifecycle state.
    pub state: WorldState,
    /// Tents standing at the camp.
    pub tents: Option<Tents>,
    /// Estimated death time, minutes past the hour.
    pub time: Option<WbsTime>,
    /// Free-text remarks from scouts.
    pub notes: Option<String>,
    /// Scout that claimed this world through `take`.
    pub assigned: Option<String>,
    /// Scouts flagged the world (minigames nearby, odd spawn, ...).
    pub suspicious: bool,
}

impl World {
    /// A world nobody has reported on yet.
    pub const fn new(number: u32) -> Self {
        Self {
            number,
            location: Location::Unknown,
            state: WorldState::NoInfo,
            tents: None,
            time: None,
            notes: None,
            assigned: None,
            suspicious: false,
        }
    }

    /// Force the world to `Dead`.
    pub const fn mark_dead(&mut self) {
        self.state = WorldState::Dead;
    }

    /// Time left until the estimated death, if one is known.
    pub fn remaining_time(&self, now: WbsTime) -> Option<WbsTime> {
        self.time.map(|death| now.time_until(death))
    }

    /// Downgrade `Alive` to `Dead` once `now` reaches the death time.
    ///
    /// Returns `true` if the world died.
    pub fn refresh_state(&mut self, now: WbsTime) -> bool {
        match self.time {
            Some(death) if self.state == WorldState::Alive && now >= death => {
                self.state = WorldState::Dead;
                true
            }
            _ => false,
        }
    }

    /// Merge every set field of `update` into this world.
    ///
    /// Returns `true` iff the world actually changed.
    pub fn apply(&mut self, update: &WorldUpdate) -> bool {
        let before = self.clone();
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(state) = update.state {
            self.state = state;
        }
        if let Some(tents) = &update.tents {
            self.tents = Some(tents.clone());
        }
        if let Some(time) = update.time {
            self.time = Some(time);
        }
        if let Some(notes) = &update.notes {
            self.notes = Some(notes.clone());
        }
        if update.suspicious {
            self.suspicious = true;
        }
        *self != before
    }

    /// Whether scouts reported anything about this world.
    pub const fn has_info(&self) -> bool {
        !matches!(self.location, Location::Unknown)
            || !matches!(self.state, WorldState::NoInfo)
            || self.tents.is_some()
            || self.time.is_some()
            || self.notes.is_some()
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}: {} {} {} {}",
            self.number,
            self.location,
            self.state,
            self.tents.as_ref().map_or("", Tents::as_str),
            self.time.map_or_else(|| "-".to_owned(), |t| t.to_string()),
            self.suspicious,
            self.notes.as_deref().unwrap_or(""),
        )
    }
}
