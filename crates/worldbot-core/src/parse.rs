//! Free-text update line parser.
//!
//! A line such as `119dwf 10gc` or `84 beamed02 hcf clear` is consumed
//! greedily from left to right. Each pass over the remainder tries the
//! [`RULES`] table in order; the first rule that matches consumes its token
//! and records one field on the [`WorldUpdate`]. When nothing matches, the
//! whole remainder becomes the notes and parsing stops. Every pass consumes
//! at least one character, so parsing always terminates.

use tracing::debug;
use worldbot_types::{Location, Tents, WbsTime, WorldState, WorldUpdate};

use crate::error::WaveError;
use crate::wave::Wave;

/// Characters skipped after every consumed token.
const SEPARATORS: [char; 2] = [' ', ':'];

/// Tokens that flag a world as suspicious. Longer tokens sharing a prefix
/// come first.
const SUSPICIOUS_TOKENS: [&str; 5] = ["mg", "minigames", "mini", "sus", "*"];

/// Minutes added to the beam time to estimate death.
const BEAMED_LIFETIME_MINUTES: u32 = 10;

/// Minutes added to the break time to estimate death.
const BROKEN_LIFETIME_MINUTES: u32 = 5;

/// Real seconds per ten game-clock ticks.
const REAL_SECONDS_PER_TEN_TICKS: u32 = 6;

/// Parse an update line against `wave`.
///
/// Returns `Ok(None)` when the line does not start with a digit, i.e. it is
/// not an update command at all. `now` supplies the current minute and
/// second for relative times.
///
/// # Errors
///
/// Returns [`WaveError::InvalidWorld`] when the leading number is not a
/// whitelisted world, or [`WaveError::MalformedNumber`] when a number inside
/// the line does not fit in 32 bits.
pub fn parse_update(
    line: &str,
    wave: &Wave,
    now: WbsTime,
) -> Result<Option<WorldUpdate>, WaveError> {
    let lowered = line.trim().to_lowercase();
    let digits = leading_digits(&lowered);
    if digits.is_empty() {
        return Ok(None);
    }
    let number = digits
        .parse::<u32>()
        .ok()
        .filter(|n| wave.is_valid(*n))
        .ok_or_else(|| WaveError::InvalidWorld(digits.to_owned()))?;

    let rest = lowered.get(digits.len()..).unwrap_or_default();
    let mut scan = Scan {
        rest: skip_separators(rest),
        update: WorldUpdate::new(number),
        time_found: false,
        now,
    };
    debug!(number, rest = scan.rest, "parsing update line");

    'tokens: while !scan.rest.is_empty() {
        scan.rest = scan.rest.trim_start();
        if scan.rest.is_empty() {
            break;
        }
        for (name, rule) in RULES {
            if rule(&mut scan)? {
                debug!(rule = name, rest = scan.rest, "token consumed");
                continue 'tokens;
            }
        }
        debug!(notes = scan.rest, "unrecognized token, rest is notes");
        scan.update.notes = Some(scan.rest.to_owned());
        break;
    }

    Ok(Some(scan.update))
}

/// Parse an inclusive `lo-hi` range such as `1-10`.
pub fn parse_range(arg: &str) -> Option<(u32, u32)> {
    let (lower, upper) = arg.trim().split_once('-')?;
    Some((lower.parse().ok()?, upper.parse().ok()?))
}

/// Whether `content` looks like an update line.
pub fn is_update_line(content: &str) -> bool {
    content.trim_start().starts_with(|c: char| c.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// A token rule: consumes a prefix of the remainder and returns `true`, or
/// leaves the remainder alone and returns `false`.
type Rule = fn(&mut Scan<'_>) -> Result<bool, WaveError>;

/// Token rules in priority order. Tents are tried before locations.
const RULES: [(&str, Rule); 9] = [
    ("suspicious", suspicious),
    ("dead", dead),
    ("dies", dies),
    ("beaming", beaming),
    ("tents", tents),
    ("location", location),
    ("beamed", beamed),
    ("broken", broken),
    ("clock", clock),
];

/// Parser state threaded through the rules.
struct Scan<'a> {
    rest: &'a str,
    update: WorldUpdate,
    time_found: bool,
    now: WbsTime,
}

impl Scan<'_> {
    /// Strip the first of `tokens` that prefixes the remainder.
    fn consume(&mut self, tokens: &[&str]) -> bool {
        match tokens.iter().find(|t| self.rest.starts_with(**t)) {
            Some(token) => {
                self.advance(token.len());
                true
            }
            None => false,
        }
    }

    /// Drop `len` bytes and any separators after them.
    fn advance(&mut self, len: usize) {
        self.rest = skip_separators(self.rest.get(len..).unwrap_or_default());
    }

    /// Consume a leading run of digits, if any.
    fn number(&mut self) -> Result<Option<u32>, WaveError> {
        let digits = leading_digits(self.rest);
        if digits.is_empty() {
            return Ok(None);
        }
        let value = digits
            .parse::<u32>()
            .map_err(|_err| WaveError::MalformedNumber(digits.to_owned()))?;
        self.advance(digits.len());
        Ok(Some(value))
    }

    /// The first three characters, if the remainder has that many.
    fn three_letter_prefix(&self) -> Option<&str> {
        self.rest
            .char_indices()
            .nth(Tents::LEN)
            .map_or_else(
                || (self.rest.chars().count() == Tents::LEN).then_some(self.rest),
                |(end, _)| self.rest.get(..end),
            )
    }

    /// Record an estimated death time.
    fn set_alive_until(&mut self, time: WbsTime) {
        self.update.time = Some(time);
        self.update.state = Some(WorldState::Alive);
        self.time_found = true;
    }
}

fn suspicious(scan: &mut Scan<'_>) -> Result<bool, WaveError> {
    let hit = scan.consume(&SUSPICIOUS_TOKENS);
    if hit {
        scan.update.suspicious = true;
    }
    Ok(hit)
}

fn dead(scan: &mut Scan<'_>) -> Result<bool, WaveError> {
    let hit = scan.consume(&["dead"]);
    if hit {
        scan.update.state = Some(WorldState::Dead);
    }
    Ok(hit)
}

/// `dies 05`: dies at minute 5. A bare `dies` is swallowed.
fn dies(scan: &mut Scan<'_>) -> Result<bool, WaveError> {
    if !scan.consume(&["dies"]) {
        return Ok(false);
    }
    if let Some(minute) = scan.number()? {
        scan.update.time = Some(WbsTime::new(minute, 0));
        scan.update.state = Some(WorldState::Alive);
    }
    Ok(true)
}

fn beaming(scan: &mut Scan<'_>) -> Result<bool, WaveError> {
    let hit = scan.consume(&["beaming"]);
    if hit {
        scan.update.state = Some(WorldState::Beaming);
    }
    Ok(hit)
}

fn tents(scan: &mut Scan<'_>) -> Result<bool, WaveError> {
    let Some(tents) = scan.three_letter_prefix().and_then(Tents::parse) else {
        return Ok(false);
    };
    scan.advance(tents.as_str().len());
    scan.update.tents = Some(tents);
    Ok(true)
}

fn location(scan: &mut Scan<'_>) -> Result<bool, WaveError> {
    let Some(location) = scan.three_letter_prefix().and_then(Location::from_token) else {
        return Ok(false);
    };
    scan.advance(location.token().len());
    scan.update.location = Some(location);
    Ok(true)
}

/// `beamed [mm]`: beamed at minute `mm`, or now.
fn beamed(scan: &mut Scan<'_>) -> Result<bool, WaveError> {
    if !scan.consume(&["beamed"]) {
        return Ok(false);
    }
    let base = scan.number()?.map_or(scan.now, |m| WbsTime::new(m, 0));
    scan.set_alive_until(base.add_minutes(BEAMED_LIFETIME_MINUTES));
    Ok(true)
}

/// `broken [mm]` / `broke [mm]`: camp broken at minute `mm`, or now.
fn broken(scan: &mut Scan<'_>) -> Result<bool, WaveError> {
    if !scan.consume(&["broken", "broke"]) {
        return Ok(false);
    }
    let base = scan.number()?.map_or(scan.now, |m| WbsTime::new(m, 0));
    scan.set_alive_until(base.add_minutes(BROKEN_LIFETIME_MINUTES));
    Ok(true)
}

/// `mm[:ss] [gc|mins]`: time left on the camp.
///
/// Game-clock ticks are the default; `mins` (or a bare `m`) marks real
/// minutes. Only the first time in a line is parsed so numbers in trailing
/// notes are left alone.
fn clock(scan: &mut Scan<'_>) -> Result<bool, WaveError> {
    if scan.time_found || !scan.rest.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(false);
    }
    let minutes = scan.number()?.unwrap_or(0);
    let seconds = scan.number()?.unwrap_or(0);

    let offset = if scan.consume(&["mins"]) || consume_bare_m(scan) {
        WbsTime::new(minutes, seconds)
    } else {
        scan.consume(&["gc"]);
        game_ticks_to_real(WbsTime::new(minutes, seconds))
    };
    scan.set_alive_until(scan.now.add(offset));
    Ok(true)
}

/// `m` as a minutes suffix, only when not the start of another word.
fn consume_bare_m(scan: &mut Scan<'_>) -> bool {
    let mut chars = scan.rest.chars();
    let is_bare = chars.next() == Some('m') && !chars.next().is_some_and(char::is_alphabetic);
    if is_bare {
        scan.advance(1);
    }
    is_bare
}

/// Convert a game-clock reading to real time. One tick is 0.6 seconds;
/// fractions of a second are dropped.
pub fn game_ticks_to_real(ticks: WbsTime) -> WbsTime {
    let real = ticks
        .total_seconds()
        .saturating_mul(REAL_SECONDS_PER_TEN_TICKS)
        .checked_div(10)
        .unwrap_or(0);
    WbsTime::from_seconds(real)
}

fn leading_digits(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(idx, _)| idx);
    s.get(..end).unwrap_or_default()
}

fn skip_separators(s: &str) -> &str {
    s.trim_start_matches(SEPARATORS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{WaveConfig, WorldsConfig};

    fn wave() -> Wave {
        Wave::new(&WorldsConfig::default(), &WaveConfig::default())
    }

    fn now() -> WbsTime {
        WbsTime::new(5, 0)
    }

    fn parse(line: &str) -> WorldUpdate {
        parse_update(line, &wave(), now()).unwrap().unwrap()
    }

    #[test]
    fn non_numeric_line_is_not_an_update() {
        assert_eq!(parse_update("list", &wave(), now()).unwrap(), None);
        assert_eq!(parse_update("  hello 119", &wave(), now()).unwrap(), None);
        assert_eq!(parse_update("", &wave(), now()).unwrap(), None);
    }

    #[test]
    fn unknown_world_is_rejected() {
        let err = parse_update("3 dwf", &wave(), now()).unwrap_err();
        assert_eq!(err.to_string(), "World 3 is not a valid world");
        assert!(matches!(
            parse_update("99999999999 dead", &wave(), now()),
            Err(WaveError::InvalidWorld(_))
        ));
    }

    #[test]
    fn number_only_sets_nothing() {
        let update = parse("119");
        assert_eq!(update.number, 119);
        assert!(update.is_empty());
    }

    #[test]
    fn location_and_game_clock() {
        let update = parse("119dwf 10gc");
        assert_eq!(update.location, Some(Location::Dwf));
        assert_eq!(update.state, Some(WorldState::Alive));
        // 600 ticks = 360 real seconds.
        assert_eq!(update.time, Some(WbsTime::new(11, 0)));
        assert_eq!(update.notes, None);
    }

    #[test]
    fn tents_and_real_minutes() {
        let update = parse("119 mhs 4:30mins");
        assert_eq!(update.tents, Tents::parse("mhs"));
        assert_eq!(update.time, Some(WbsTime::new(9, 30)));
        assert_eq!(update.state, Some(WorldState::Alive));
        assert_eq!(update.location, None);
    }

    #[test]
    fn bare_m_means_real_minutes() {
        assert_eq!(parse("119 7m").time, Some(WbsTime::new(12, 0)));
        // `m` followed by letters is a tents code, not a unit.
        let update = parse("119 7 mhs");
        assert_eq!(update.time, Some(WbsTime::new(9, 12)));
        assert_eq!(update.tents, Tents::parse("mhs"));
    }

    #[test]
    fn dead_sets_only_state() {
        let update = parse("28 dead");
        let mut expected = WorldUpdate::new(28);
        expected.state = Some(WorldState::Dead);
        assert_eq!(update, expected);
        assert_eq!(parse("28dead"), expected);
    }

    #[test]
    fn beamed_with_minute_tents_and_notes() {
        let update = parse("84 beamed02 hcf clear");
        assert_eq!(update.time, Some(WbsTime::new(12, 0)));
        assert_eq!(update.state, Some(WorldState::Alive));
        assert_eq!(update.tents, Tents::parse("hcf"));
        assert_eq!(update.notes.as_deref(), Some("clear"));
    }

    #[test]
    fn beamed_and_broken_default_to_now() {
        assert_eq!(parse("84 beamed").time, Some(WbsTime::new(15, 0)));
        assert_eq!(parse("84 broken").time, Some(WbsTime::new(10, 0)));
        assert_eq!(parse("84 broke :07").time, Some(WbsTime::new(12, 0)));
    }

    #[test]
    fn dies_sets_absolute_minute() {
        let update = parse("70 dies :08");
        assert_eq!(update.time, Some(WbsTime::new(8, 0)));
        assert_eq!(update.state, Some(WorldState::Alive));
        let bare = parse("70 dies");
        assert!(bare.is_empty());
    }

    #[test]
    fn beaming_and_suspicious() {
        let update = parse("45 elm beaming mg");
        assert_eq!(update.location, Some(Location::Elm));
        assert_eq!(update.state, Some(WorldState::Beaming));
        assert!(update.suspicious);
        assert!(parse("45 *").suspicious);
        assert!(parse("45 minigames").suspicious);
        assert!(parse("45 sus").suspicious);
    }

    #[test]
    fn only_first_time_is_parsed() {
        let update = parse("84 10gc clear by 7");
        assert_eq!(update.time, Some(WbsTime::new(11, 0)));
        assert_eq!(update.notes.as_deref(), Some("clear by 7"));

        let update = parse("84 beamed 12 4:00mins");
        assert_eq!(update.time, Some(WbsTime::new(22, 0)));
        assert_eq!(update.notes.as_deref(), Some("4:00mins"));
    }

    #[test]
    fn line_is_lowercased_and_trimmed() {
        let update = parse("  119 RDI HCF  ");
        assert_eq!(update.location, Some(Location::Rdi));
        assert_eq!(update.tents, Tents::parse("hcf"));
    }

    #[test]
    fn unrecognized_first_token_is_all_notes() {
        let update = parse("119 nobody here dwf");
        assert_eq!(update.notes.as_deref(), Some("nobody here dwf"));
        assert_eq!(update.location, None);
    }

    #[test]
    fn oversized_inner_number_is_malformed() {
        assert!(matches!(
            parse_update("119 dies 99999999999", &wave(), now()),
            Err(WaveError::MalformedNumber(_))
        ));
    }

    #[test]
    fn game_clock_conversion_floors() {
        assert_eq!(game_ticks_to_real(WbsTime::new(0, 1)), WbsTime::ZERO);
        assert_eq!(game_ticks_to_real(WbsTime::new(0, 5)), WbsTime::new(0, 3));
        assert_eq!(game_ticks_to_real(WbsTime::new(10, 0)), WbsTime::new(6, 0));
    }

    #[test]
    fn range_parsing() {
        assert_eq!(parse_range("1-10"), Some((1, 10)));
        assert_eq!(parse_range("10"), None);
        assert_eq!(parse_range("a-3"), None);
    }

    #[test]
    fn update_line_detection() {
        assert!(is_update_line("119 dwf"));
        assert!(is_update_line("  2"));
        assert!(!is_update_line(".take"));
        assert!(!is_update_line(""));
    }
}
