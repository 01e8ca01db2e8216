//! End-to-end scouting scenarios.
//!
//! Drive the parser, registry, and renderer together with a fixed clock,
//! the same way a platform shim does during a wave.

#![allow(clippy::unwrap_used, clippy::panic, clippy::arithmetic_side_effects)]

use chrono::{DateTime, TimeZone, Utc};
use worldbot_core::config::{WaveConfig, WorldsConfig};
use worldbot_core::{Author, Bot, BotConfig, Reply, Wave, WaveError, parse_update, render_status};
use worldbot_types::{Location, Tents, WbsTime, WorldState, WorldUpdate};

fn default_wave() -> Wave {
    Wave::from_config(&BotConfig::default())
}

fn small_wave(valid: &[u32]) -> Wave {
    let worlds = WorldsConfig {
        valid: valid.to_vec(),
        hidden: Vec::new(),
    };
    Wave::new(&worlds, &WaveConfig::default())
}

fn fixed_now() -> WbsTime {
    WbsTime::new(4, 0)
}

fn wall_clock(minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 3, 10, minute, second)
        .single()
        .unwrap()
}

#[test]
fn dead_suffix_sets_only_state_for_every_world() {
    let wave = default_wave();
    let numbers: Vec<u32> = wave.worlds().map(|w| w.number).collect();
    for n in numbers {
        let update = parse_update(&format!("{n}dead"), &wave, fixed_now())
            .unwrap()
            .unwrap();
        let mut expected = WorldUpdate::new(n);
        expected.state = Some(WorldState::Dead);
        assert_eq!(update, expected, "world {n}");
    }
}

#[test]
fn documented_examples() {
    let wave = default_wave();
    let now = fixed_now();

    let update = parse_update("119dwf 10gc", &wave, now).unwrap().unwrap();
    assert_eq!(update.number, 119);
    assert_eq!(update.location, Some(Location::Dwf));
    assert_eq!(update.state, Some(WorldState::Alive));
    assert_eq!(update.time, Some(now.add(WbsTime::new(6, 0))));

    let update = parse_update("119 mhs 4:30mins", &wave, now).unwrap().unwrap();
    assert_eq!(update.tents, Tents::parse("mhs"));
    assert_eq!(update.time, Some(now.add(WbsTime::new(4, 30))));

    let update = parse_update("84 beamed02 hcf clear", &wave, now)
        .unwrap()
        .unwrap();
    assert_eq!(update.time, Some(WbsTime::new(12, 0)));
    assert_eq!(update.tents, Tents::parse("hcf"));
    assert_eq!(update.notes.as_deref(), Some("clear"));
}

#[test]
fn game_clock_text_reparses_within_tolerance() {
    let wave = default_wave();
    let now = fixed_now();
    for real_seconds in (0..=1200).step_by(37) {
        // Real seconds -> game ticks, rounded down.
        let ticks = WbsTime::from_seconds(real_seconds * 10 / 6);
        let line = format!("119 {ticks}gc");
        let parsed = parse_update(&line, &wave, now).unwrap().unwrap();
        let offset = parsed.time.unwrap().total_seconds() - now.total_seconds();
        assert!(
            real_seconds.abs_diff(offset) <= 1,
            "{line}: expected ~{real_seconds}s, got {offset}s"
        );
    }
}

#[test]
fn invalid_world_leaves_registry_untouched() {
    let mut wave = default_wave();
    let before = wave.clone();

    let err = parse_update("3 dwf 10gc", &wave, fixed_now()).unwrap_err();
    assert_eq!(err, WaveError::InvalidWorld("3".to_owned()));

    let mut stray = WorldUpdate::new(3);
    stray.location = Some(Location::Dwf);
    assert!(wave.update(&stray).is_err());
    assert_eq!(wave, before);
}

#[test]
fn applying_the_same_update_twice() {
    let mut wave = default_wave();
    let update = parse_update("84 beamed02 hcf clear", &wave, fixed_now())
        .unwrap()
        .unwrap();
    assert!(wave.update(&update).unwrap());
    let once = wave.clone();
    assert!(!wave.update(&update).unwrap());
    assert_eq!(wave, once);
}

#[test]
fn take_under_supply_then_nothing_left() {
    let mut wave = small_wave(&[1, 2, 4, 5]);
    let dead = parse_update("2 dead", &wave, fixed_now()).unwrap().unwrap();
    wave.update(&dead).unwrap();

    let first = wave.take(5, Location::Unknown, "alice").unwrap();
    assert_eq!(first.worlds, vec![1, 4, 5]);
    assert!(first.exhausted);
    assert_eq!(first.to_string(), "1, 4, 5. No more worlds available.");

    let second = wave.take(5, Location::Unknown, "alice").unwrap();
    assert!(second.worlds.is_empty());
    assert!(second.exhausted);
}

#[test]
fn refresh_transitions_exactly_the_due_worlds() {
    let mut wave = default_wave();
    let at = WbsTime::new(3, 0);
    for line in ["1 dies 5", "2 dies 6", "4 dies 7", "5 beaming", "6 dwf"] {
        let update = parse_update(line, &wave, at).unwrap().unwrap();
        wave.update(&update).unwrap();
    }

    assert!(wave.refresh_states(WbsTime::new(4, 59)).is_empty());
    assert_eq!(wave.refresh_states(WbsTime::new(6, 0)), vec![1, 2]);
    assert_eq!(wave.get(4).unwrap().state, WorldState::Alive);
    assert_eq!(wave.get(5).unwrap().state, WorldState::Beaming);
    assert_eq!(wave.get(6).unwrap().state, WorldState::NoInfo);
}

#[test]
fn time_until_does_not_wrap_into_next_hour() {
    assert_eq!(WbsTime::new(58, 0).time_until(WbsTime::new(2, 0)), WbsTime::ZERO);
}

#[test]
fn full_wave_through_the_dispatcher() {
    let mut bot = Bot::new(BotConfig::default()).unwrap();
    let alice = Author::named("alice");
    let bob = Author::named("bob");

    assert_eq!(bot.handle_message(&alice, ".host", wall_clock(0, 0)), Reply::Ack);
    assert_eq!(
        bot.handle_message(&bob, ".t 3", wall_clock(0, 10)),
        Reply::Respond("1, 2, 4".to_owned())
    );

    for line in ["1 dwf 10gc", "2 elm beaming mg", "119 rdi dies 9 hcf near bank"] {
        assert_eq!(bot.handle_message(&bob, line, wall_clock(1, 0)), Reply::Discard);
    }

    // bob never reported on 4; taking again sweeps it.
    assert_eq!(
        bot.handle_message(&bob, ".td 1", wall_clock(2, 0)),
        Reply::Respond("5".to_owned())
    );
    assert_eq!(bot.wave().get(4).unwrap().state, WorldState::Dead);

    let Reply::Status(report) = bot.handle_message(&alice, "list", wall_clock(5, 0)) else {
        panic!("expected a status report");
    };
    assert_eq!(report.section("DWF"), Some("~~1~~"));
    assert_eq!(report.section("ELM"), Some("*2*\\*"));
    assert_eq!(report.section("RDI"), Some("__119__"));
    assert_eq!(report.section("Dead"), Some("4"));
    assert_eq!(
        report.section("Active"),
        Some("```\n119 rdi : 4:00 hcf near bank\n  1 dwf : 2:00     \n```")
    );

    // Past 1's death time it drops out of the location list.
    let text = {
        let Reply::Status(report) = bot.handle_message(&alice, "list", wall_clock(7, 30)) else {
            panic!("expected a status report");
        };
        report.to_string()
    };
    assert!(!text.contains("**DWF**"));
    assert!(text.contains("**Dead**\n1,4"));

    let Reply::Respond(summary) = bot.handle_message(&alice, ".reset", wall_clock(30, 0)) else {
        panic!("expected a summary");
    };
    assert!(summary.starts_with("Host: alice"));
    assert!(bot.wave().is_empty());
    let fresh = render_status(bot.wave(), WbsTime::ZERO);
    assert!(fresh.starts_with("**Unknown**\n1,2,4,5,6,9,"));
    assert!(!fresh.contains("**Dead**"));
    assert!(!fresh.contains("**Active**"));
}
