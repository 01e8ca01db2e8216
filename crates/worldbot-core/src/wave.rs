//! The wave registry: every whitelisted world plus the wave's rosters.
//!
//! A [`Wave`] is created fully populated (one [`World`] per whitelisted
//! number) and replaced wholesale on reset. State decay is pull-based:
//! callers invoke [`Wave::refresh_states`] before rendering anything that
//! depends on remaining time.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::{debug, info};
use worldbot_types::{Location, WbsTime, World, WorldState, WorldUpdate};

use crate::config::{BotConfig, WaveConfig, WorldsConfig};
use crate::error::WaveError;

/// Result of [`Wave::take`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeOutcome {
    /// World numbers now assigned to the claimant, ascending.
    pub worlds: Vec<u32>,
    /// Fewer worlds were available than requested.
    pub exhausted: bool,
}

impl fmt::Display for TakeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = join_numbers(&self.worlds);
        match (list.is_empty(), self.exhausted) {
            (true, _) => f.write_str("No more worlds available."),
            (false, true) => write!(f, "{list}. No more worlds available."),
            (false, false) => f.write_str(&list),
        }
    }
}

/// Registry of world states and rosters for the current wave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wave {
    /// Every whitelisted world keyed by number.
    worlds: BTreeMap<u32, World>,
    /// Worlds left out of the default status view.
    hidden: BTreeSet<u32>,
    /// Friends chat restored on reset.
    default_fc: String,
    /// In-game friends chat everyone should join.
    pub fc_name: String,
    /// Display name of the wave host.
    pub host: String,
    /// Display names of everyone scouting.
    pub scouts: BTreeSet<String>,
    /// Display names of everyone on anti duty.
    pub anti: BTreeSet<String>,
    /// Free-text world calls made with `.call`, in order.
    pub call_history: Vec<String>,
}

impl Wave {
    /// A fresh wave with no information about any world.
    pub fn new(worlds: &WorldsConfig, wave: &WaveConfig) -> Self {
        Self {
            worlds: fresh_worlds(worlds.valid.iter().copied()),
            hidden: worlds.hidden.iter().copied().collect(),
            default_fc: wave.default_fc.clone(),
            fc_name: wave.default_fc.clone(),
            host: String::new(),
            scouts: BTreeSet::new(),
            anti: BTreeSet::new(),
            call_history: Vec::new(),
        }
    }

    /// A fresh wave built from the full bot configuration.
    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(&config.worlds, &config.wave)
    }

    /// Whether `number` is a whitelisted world.
    pub fn is_valid(&self, number: u32) -> bool {
        self.worlds.contains_key(&number)
    }

    /// Whether `number` is excluded from the default status view.
    pub fn is_hidden(&self, number: u32) -> bool {
        self.hidden.contains(&number)
    }

    /// Look up a world.
    ///
    /// # Errors
    ///
    /// Returns [`WaveError::InvalidWorld`] if `number` is not whitelisted.
    pub fn get(&self, number: u32) -> Result<&World, WaveError> {
        self.worlds
            .get(&number)
            .ok_or_else(|| WaveError::invalid_world(number))
    }

    /// Look up a world for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`WaveError::InvalidWorld`] if `number` is not whitelisted.
    pub fn get_mut(&mut self, number: u32) -> Result<&mut World, WaveError> {
        self.worlds
            .get_mut(&number)
            .ok_or_else(|| WaveError::invalid_world(number))
    }

    /// All worlds in ascending number order.
    pub fn worlds(&self) -> impl Iterator<Item = &World> {
        self.worlds.values()
    }

    /// Worlds shown in the default status view, ascending.
    pub fn visible_worlds(&self) -> impl Iterator<Item = &World> {
        self.worlds
            .values()
            .filter(|w| !self.hidden.contains(&w.number))
    }

    /// Merge a parsed update into its target world.
    ///
    /// Returns `true` iff the world changed.
    ///
    /// # Errors
    ///
    /// Returns [`WaveError::InvalidWorld`] if the update targets a world
    /// that is not whitelisted; the registry is left untouched.
    pub fn update(&mut self, update: &WorldUpdate) -> Result<bool, WaveError> {
        let world = self.get_mut(update.number)?;
        let changed = world.apply(update);
        debug!(world = %world, changed, "applied world update");
        Ok(changed)
    }

    /// Mark every `Alive` world whose death time has passed as `Dead`.
    ///
    /// Returns the numbers of the worlds that died in this sweep.
    pub fn refresh_states(&mut self, now: WbsTime) -> Vec<u32> {
        let died: Vec<u32> = self
            .worlds
            .values_mut()
            .filter_map(|w| w.refresh_state(now).then_some(w.number))
            .collect();
        if !died.is_empty() {
            debug!(now = %now, died = ?died, "worlds expired");
        }
        died
    }

    /// Assign up to `count` unscouted worlds at `location` to `claimant`.
    ///
    /// Candidates are visible, unclaimed, `NoInfo` worlds at `location`,
    /// taken in ascending number order.
    ///
    /// # Errors
    ///
    /// Returns [`WaveError::InvalidCount`] if `count` is zero.
    pub fn take(
        &mut self,
        count: usize,
        location: Location,
        claimant: &str,
    ) -> Result<TakeOutcome, WaveError> {
        if count == 0 {
            return Err(WaveError::InvalidCount(count.to_string()));
        }
        let hidden = &self.hidden;
        let taken: Vec<u32> = self
            .worlds
            .values_mut()
            .filter(|w| {
                w.location == location
                    && w.state == WorldState::NoInfo
                    && w.assigned.is_none()
                    && !hidden.contains(&w.number)
            })
            .take(count)
            .map(|w| {
                w.assigned = Some(claimant.to_owned());
                w.number
            })
            .collect();
        let exhausted = taken.len() < count;
        info!(
            claimant,
            location = %location,
            requested = count,
            taken = ?taken,
            exhausted,
            "worlds taken"
        );
        Ok(TakeOutcome {
            worlds: taken,
            exhausted,
        })
    }

    /// Mark every `NoInfo` world assigned to `claimant` as `Dead`.
    ///
    /// Used before a scout takes a fresh batch: anything they never
    /// reported on is assumed dead. Returns how many worlds were swept.
    pub fn mark_noinfo_dead_for(&mut self, claimant: &str) -> usize {
        let mut swept = 0_usize;
        for world in self.worlds.values_mut().filter(|w| {
            w.state == WorldState::NoInfo && w.assigned.as_deref() == Some(claimant)
        }) {
            world.mark_dead();
            swept = swept.saturating_add(1);
        }
        debug!(claimant, swept, "swept unreported worlds");
        swept
    }

    /// Mark the listed worlds as `Dead`.
    ///
    /// Every number is validated before anything changes.
    ///
    /// # Errors
    ///
    /// Returns [`WaveError::InvalidWorld`] for the first number that is not
    /// whitelisted.
    pub fn mark_dead(&mut self, numbers: &[u32]) -> Result<usize, WaveError> {
        if let Some(&bad) = numbers.iter().find(|n| !self.is_valid(**n)) {
            return Err(WaveError::invalid_world(bad));
        }
        let mut marked = 0_usize;
        for number in numbers {
            if let Some(world) = self.worlds.get_mut(number) {
                world.mark_dead();
                marked = marked.saturating_add(1);
            }
        }
        Ok(marked)
    }

    /// Mark every whitelisted world in `lower..=upper` as `Dead`.
    pub fn mark_dead_range(&mut self, lower: u32, upper: u32) -> usize {
        if lower > upper {
            return 0;
        }
        let mut marked = 0_usize;
        for world in self.worlds.range_mut(lower..=upper).map(|(_, w)| w) {
            world.mark_dead();
            marked = marked.saturating_add(1);
        }
        marked
    }

    /// Replace every world with a fresh `NoInfo` world and clear the
    /// rosters. The friends chat goes back to the configured default.
    pub fn reset(&mut self) {
        let numbers: Vec<u32> = self.worlds.keys().copied().collect();
        self.worlds = fresh_worlds(numbers);
        self.fc_name.clone_from(&self.default_fc);
        self.host.clear();
        self.scouts.clear();
        self.anti.clear();
        self.call_history.clear();
        info!(worlds = self.worlds.len(), "wave reset");
    }

    /// Whether no world has any reported information.
    pub fn is_empty(&self) -> bool {
        !self.worlds.values().any(World::has_info)
    }

    /// End-of-wave summary: host, scouts, anti, and call history.
    pub fn summary(&self) -> String {
        format!(
            "Host: {}\nScouts: {}\nAnti: {}\nWorlds: {}",
            self.host,
            join_names(&self.scouts),
            join_names(&self.anti),
            self.call_history.join(", "),
        )
    }

    /// Multi-line dump of rosters and every world with information.
    pub fn debug_info(&self) -> String {
        let mut out = format!(
            "FC: {}\nHost: {}\nScouts: {}\nAnti: {}\nCalls: {}\nRegistry:",
            self.fc_name,
            self.host,
            join_names(&self.scouts),
            join_names(&self.anti),
            self.call_history.join(", "),
        );
        for world in self.worlds.values().filter(|w| w.has_info() || w.assigned.is_some()) {
            out.push('\n');
            out.push_str(&world.to_string());
        }
        out
    }
}

/// One `NoInfo` world per number.
fn fresh_worlds(numbers: impl IntoIterator<Item = u32>) -> BTreeMap<u32, World> {
    numbers.into_iter().map(|n| (n, World::new(n))).collect()
}

/// `a, b, c` from an ordered set of names.
fn join_names(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// `1, 2, 3` from world numbers.
fn join_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use worldbot_types::Tents;

    use super::*;

    fn small_wave() -> Wave {
        let worlds = WorldsConfig {
            valid: vec![1, 2, 4, 5, 6, 9, 10],
            hidden: vec![9],
        };
        Wave::new(&worlds, &WaveConfig::default())
    }

    #[test]
    fn registry_is_fully_populated() {
        let wave = small_wave();
        assert_eq!(wave.worlds().count(), 7);
        assert!(wave.worlds().all(|w| w.state == WorldState::NoInfo));
        assert!(wave.is_empty());
        assert_eq!(wave.fc_name, "Wbs United");
    }

    #[test]
    fn get_rejects_unknown_worlds() {
        let wave = small_wave();
        assert!(wave.get(4).is_ok());
        assert_eq!(wave.get(3).unwrap_err(), WaveError::invalid_world(3));
    }

    #[test]
    fn update_invalid_world_leaves_registry_unchanged() {
        let mut wave = small_wave();
        let before = wave.clone();
        let mut update = WorldUpdate::new(3);
        update.state = Some(WorldState::Dead);
        assert!(wave.update(&update).is_err());
        assert_eq!(wave, before);
    }

    #[test]
    fn update_merges_and_reports_change() {
        let mut wave = small_wave();
        let mut update = WorldUpdate::new(5);
        update.location = Some(Location::Elm);
        update.tents = Tents::parse("hcf");
        assert!(wave.update(&update).unwrap());
        assert!(!wave.update(&update).unwrap());
        let world = wave.get(5).unwrap();
        assert_eq!(world.location, Location::Elm);
        assert!(!wave.is_empty());
    }

    #[test]
    fn refresh_kills_exactly_the_due_worlds() {
        let mut wave = small_wave();
        for (number, minute) in [(1, 5), (2, 10), (4, 15)] {
            let mut update = WorldUpdate::new(number);
            update.state = Some(WorldState::Alive);
            update.time = Some(WbsTime::new(minute, 0));
            wave.update(&update).unwrap();
        }
        let mut beaming = WorldUpdate::new(5);
        beaming.state = Some(WorldState::Beaming);
        wave.update(&beaming).unwrap();

        let died = wave.refresh_states(WbsTime::new(10, 0));
        assert_eq!(died, vec![1, 2]);
        assert_eq!(wave.get(1).unwrap().state, WorldState::Dead);
        assert_eq!(wave.get(2).unwrap().state, WorldState::Dead);
        assert_eq!(wave.get(4).unwrap().state, WorldState::Alive);
        assert_eq!(wave.get(5).unwrap().state, WorldState::Beaming);
        assert_eq!(wave.get(6).unwrap().state, WorldState::NoInfo);
    }

    #[test]
    fn take_skips_hidden_claimed_and_reported_worlds() {
        let mut wave = small_wave();
        let mut reported = WorldUpdate::new(2);
        reported.state = Some(WorldState::Dead);
        wave.update(&reported).unwrap();

        let first = wave.take(2, Location::Unknown, "alice").unwrap();
        assert_eq!(first.worlds, vec![1, 4]);
        assert!(!first.exhausted);

        let second = wave.take(5, Location::Unknown, "bob").unwrap();
        assert_eq!(second.worlds, vec![5, 6, 10]);
        assert!(second.exhausted);
        assert_eq!(second.to_string(), "5, 6, 10. No more worlds available.");

        let third = wave.take(1, Location::Unknown, "carol").unwrap();
        assert!(third.worlds.is_empty());
        assert!(third.exhausted);
        assert_eq!(third.to_string(), "No more worlds available.");

        assert_eq!(wave.get(1).unwrap().assigned.as_deref(), Some("alice"));
        assert_eq!(wave.get(9).unwrap().assigned, None);
    }

    #[test]
    fn take_filters_by_location() {
        let mut wave = small_wave();
        let mut elm = WorldUpdate::new(6);
        elm.location = Some(Location::Elm);
        wave.update(&elm).unwrap();
        let outcome = wave.take(3, Location::Elm, "alice").unwrap();
        assert_eq!(outcome.worlds, vec![6]);
        assert!(outcome.exhausted);
    }

    #[test]
    fn take_zero_is_rejected() {
        let mut wave = small_wave();
        assert!(matches!(
            wave.take(0, Location::Unknown, "alice"),
            Err(WaveError::InvalidCount(_))
        ));
    }

    #[test]
    fn sweep_only_touches_claimant_noinfo_worlds() {
        let mut wave = small_wave();
        wave.take(3, Location::Unknown, "alice").unwrap();
        wave.take(1, Location::Unknown, "bob").unwrap();

        let mut reported = WorldUpdate::new(2);
        reported.location = Some(Location::Dwf);
        reported.state = Some(WorldState::Alive);
        reported.time = Some(WbsTime::new(20, 0));
        wave.update(&reported).unwrap();

        assert_eq!(wave.mark_noinfo_dead_for("alice"), 2);
        assert_eq!(wave.get(1).unwrap().state, WorldState::Dead);
        assert_eq!(wave.get(2).unwrap().state, WorldState::Alive);
        assert_eq!(wave.get(4).unwrap().state, WorldState::Dead);
        assert_eq!(wave.get(5).unwrap().state, WorldState::NoInfo);
    }

    #[test]
    fn mark_dead_validates_before_mutating() {
        let mut wave = small_wave();
        assert!(wave.mark_dead(&[1, 3]).is_err());
        assert_eq!(wave.get(1).unwrap().state, WorldState::NoInfo);
        assert_eq!(wave.mark_dead(&[1, 2]).unwrap(), 2);
        assert_eq!(wave.get(2).unwrap().state, WorldState::Dead);
    }

    #[test]
    fn mark_dead_range_is_inclusive_and_whitelisted() {
        let mut wave = small_wave();
        assert_eq!(wave.mark_dead_range(2, 6), 4);
        assert_eq!(wave.get(2).unwrap().state, WorldState::Dead);
        assert_eq!(wave.get(6).unwrap().state, WorldState::Dead);
        assert_eq!(wave.get(9).unwrap().state, WorldState::NoInfo);
        assert_eq!(wave.mark_dead_range(9, 2), 0);
    }

    #[test]
    fn reset_clears_worlds_and_rosters() {
        let mut wave = small_wave();
        wave.fc_name = "other fc".to_owned();
        wave.host = "alice".to_owned();
        wave.scouts.insert("bob".to_owned());
        wave.anti.insert("carol".to_owned());
        wave.call_history.push("10 dwf hcf".to_owned());
        wave.take(2, Location::Unknown, "bob").unwrap();
        wave.mark_dead(&[5]).unwrap();

        wave.reset();
        assert_eq!(wave, small_wave());
    }

    #[test]
    fn summary_lists_rosters() {
        let mut wave = small_wave();
        wave.host = "alice".to_owned();
        wave.scouts.insert("dave".to_owned());
        wave.scouts.insert("bob".to_owned());
        wave.call_history.push("10 dwf".to_owned());
        wave.call_history.push("4 elm".to_owned());
        assert_eq!(
            wave.summary(),
            "Host: alice\nScouts: bob, dave\nAnti: \nWorlds: 10 dwf, 4 elm"
        );
    }
}
