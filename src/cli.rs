use futures_util::StreamExt;

use crate::data::roster::{builtin_critters, demo_config, Difficulty};
use crate::encounter::export::write_steps_csv;
use crate::encounter::model::EncounterState;
use crate::encounter::odds::estimate_odds_parallel;
use crate::encounter::projection::project_slot;
use crate::encounter::rng::seed_from_entropy;
use crate::encounter::sequencer::{begin_resolution, StepEvent};
use crate::pacing::PacingPreset;
use crate::parallel::WorkerPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Project,
    Resolve,
    Odds,
    Presets,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("project") => Some(Command::Project),
        Some("resolve") => Some(Command::Resolve),
        Some("odds") => Some(Command::Odds),
        Some("presets") => Some(Command::Presets),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Project) => handle_project(args),
        Some(Command::Resolve) => handle_resolve(args),
        Some(Command::Odds) => handle_odds(args),
        Some(Command::Presets) => handle_presets(),
        None => {
            eprintln!("usage: thicket <project|resolve|odds|presets>");
            2
        }
    }
}

/// Demo board: three slots against the named lineup, hand dealt from the
/// builtin roster and slotted greedily in hand order.
fn demo_rostered_state(difficulty: Difficulty) -> EncounterState {
    let mut state = EncounterState::new(&demo_config(difficulty));
    state.deal_hand(builtin_critters());
    let slot_ids: Vec<String> = state.player_slots.iter().map(|s| s.id.clone()).collect();
    let hand_ids: Vec<String> = state.hand.iter().map(|c| c.id.clone()).collect();
    for (slot_id, critter_id) in slot_ids.iter().zip(hand_ids.iter()) {
        state.roster(slot_id, critter_id);
    }
    state
}

fn parse_difficulty_arg(raw: Option<&String>) -> Difficulty {
    match raw {
        Some(value) => Difficulty::from_name(value).unwrap_or_else(|| {
            eprintln!("unknown difficulty '{value}', defaulting to medium");
            Difficulty::Medium
        }),
        None => Difficulty::Medium,
    }
}

fn handle_project(args: &[String]) -> i32 {
    let difficulty = parse_difficulty_arg(args.get(2));
    let state = demo_rostered_state(difficulty);

    let slot_report = |slots: &[crate::encounter::model::Slot]| -> Vec<serde_json::Value> {
        slots
            .iter()
            .map(|slot| {
                let projection = project_slot(slot, &state.player_slots, &state.enemy_slots);
                serde_json::json!({
                    "slot_id": slot.id,
                    "occupant": slot.occupant.as_ref().map(|c| c.name.clone()),
                    "projection": projection,
                })
            })
            .collect()
    };

    let player_total = crate::encounter::projection::project_team(
        &state.player_slots,
        &state.player_slots,
        &state.enemy_slots,
    );
    let enemy_total = crate::encounter::projection::project_team(
        &state.enemy_slots,
        &state.player_slots,
        &state.enemy_slots,
    );
    let report = serde_json::json!({
        "difficulty": difficulty.name(),
        "player_slots": slot_report(&state.player_slots),
        "enemy_slots": slot_report(&state.enemy_slots),
        "player_projection": player_total,
        "enemy_projection": enemy_total,
        "diff": player_total - enemy_total,
    });

    match serde_json::to_string_pretty(&report) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize projection report: {err}");
            1
        }
    }
}

fn handle_resolve(args: &[String]) -> i32 {
    let seed = parse_u64_arg(args.get(2), "seed", seed_from_entropy());
    let preset = match args.get(3) {
        Some(value) if !value.starts_with("--") => {
            PacingPreset::from_name(value).unwrap_or_else(|| {
                eprintln!("unknown pacing preset '{value}', defaulting to instant");
                PacingPreset::Instant
            })
        }
        _ => PacingPreset::Instant,
    };
    let as_csv = args.iter().any(|arg| arg == "--csv");

    let mut state = demo_rostered_state(Difficulty::Medium);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            return 1;
        }
    };

    let resolved = runtime.block_on(async {
        let pacing = preset.timings();
        let mut handle = begin_resolution(&mut state, &pacing, seed)?;
        let mut stream = handle.events()?;
        let mut events: Vec<StepEvent> = Vec::new();
        while let Some(event) = stream.next().await {
            events.push(event);
        }
        let result = handle.join().await?;
        Some((events, result))
    });

    let Some((events, result)) = resolved else {
        eprintln!("resolution did not start: roster at least one critter first");
        return 1;
    };
    state.finish_resolution();

    if as_csv {
        if let Err(err) = write_steps_csv(std::io::stdout(), &events) {
            eprintln!("failed to write csv: {err}");
            return 1;
        }
        println!(
            "# player={} enemy={} victory={}",
            result.player_score, result.enemy_score, result.victory
        );
        return 0;
    }

    let payload = serde_json::json!({
        "seed": seed,
        "pacing": preset.name(),
        "events": events,
        "result": result,
    });
    match serde_json::to_string_pretty(&payload) {
        Ok(text) => {
            println!("{text}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize result: {err}");
            1
        }
    }
}

fn handle_odds(args: &[String]) -> i32 {
    let iterations = parse_usize_arg(args.get(2), "iterations", 500);
    let seed = parse_u64_arg(args.get(3), "seed", seed_from_entropy());
    let difficulty = parse_difficulty_arg(args.get(4));

    let state = demo_rostered_state(difficulty);
    let estimate = estimate_odds_parallel(&state, iterations, seed, &WorkerPool::default_workers());

    match serde_json::to_string_pretty(&estimate) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize odds estimate: {err}");
            1
        }
    }
}

fn handle_presets() -> i32 {
    let table: serde_json::Map<String, serde_json::Value> = PacingPreset::ALL
        .iter()
        .map(|preset| {
            let value = serde_json::to_value(preset.timings()).unwrap_or_default();
            (preset.name().to_string(), value)
        })
        .collect();
    match serde_json::to_string_pretty(&table) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize preset table: {err}");
            1
        }
    }
}

fn parse_u64_arg(raw: Option<&String>, name: &str, default: u64) -> u64 {
    raw.and_then(|value| value.parse::<u64>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                if !value.starts_with("--") {
                    eprintln!("invalid {name} '{value}', defaulting to {default}");
                }
            }
            default
        })
}

fn parse_usize_arg(raw: Option<&String>, name: &str, default: usize) -> usize {
    raw.and_then(|value| value.parse::<usize>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                if !value.starts_with("--") {
                    eprintln!("invalid {name} '{value}', defaulting to {default}");
                }
            }
            default
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn known_commands_parse() {
        assert_eq!(parse_command(&args(&["thicket", "project"])), Some(Command::Project));
        assert_eq!(parse_command(&args(&["thicket", "resolve"])), Some(Command::Resolve));
        assert_eq!(parse_command(&args(&["thicket", "odds"])), Some(Command::Odds));
        assert_eq!(parse_command(&args(&["thicket", "presets"])), Some(Command::Presets));
        assert_eq!(parse_command(&args(&["thicket", "serve"])), None);
        assert_eq!(parse_command(&args(&["thicket"])), None);
    }

    #[test]
    fn unknown_command_exits_with_usage() {
        assert_eq!(run_with_args(&args(&["thicket", "bogus"])), 2);
    }

    #[test]
    fn numeric_arg_fallbacks() {
        assert_eq!(parse_u64_arg(Some(&"12".to_string()), "seed", 7), 12);
        assert_eq!(parse_u64_arg(Some(&"twelve".to_string()), "seed", 7), 7);
        assert_eq!(parse_u64_arg(None, "seed", 7), 7);
        assert_eq!(parse_usize_arg(Some(&"250".to_string()), "iterations", 500), 250);
    }

    #[test]
    fn demo_state_fills_all_three_slots() {
        let state = demo_rostered_state(Difficulty::Medium);
        assert!(state.player_slots.iter().all(|s| s.is_occupied()));
        assert_eq!(state.hand.len(), 2);
    }
}
