//! Builtin critter roster and preset enemy lineups, plus an optional JSON
//! roster loader for custom hands.

use std::fs;

use crate::encounter::model::{Critter, EncounterConfig, EncounterState};

/// The stock hand. Mountain Bear and Sky Hawk start exhausted and are filtered
/// out when dealt.
pub fn builtin_critters() -> Vec<Critter> {
    vec![
        Critter::new("c1", "Forest Fox", 5).with_trait("+1 Bonus to each Adjacent Critter"),
        Critter::new("c2", "Mountain Bear", 8)
            .with_trait("+3 Bonus but always Exhausts after use")
            .exhausted(),
        Critter::new("c3", "River Otter", 3),
        Critter::new("c4", "Sky Hawk", 6)
            .with_trait("Double when facing a single enemy")
            .exhausted(),
        Critter::new("c5", "Garden Rabbit", 2).with_trait("+2 Bonus when Last"),
        Critter::new("c6", "Cave Badger", 7).with_trait("+2 Bonus when Outnumbered"),
        Critter::new("c7", "Meadow Mouse", 1).with_trait("Adjacent Critters roll Lucky"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Brutal,
}

impl Difficulty {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            "brutal" => Some(Self::Brutal),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Brutal => "brutal",
        }
    }
}

fn goblin_scout() -> Critter {
    Critter::new("e1", "Goblin Scout", 3)
}

fn orc_grunt() -> Critter {
    Critter::new("e2", "Orc Grunt", 5)
}

fn troll_brute() -> Critter {
    Critter::new("e3", "Troll Brute", 7)
}

fn dark_sprite() -> Critter {
    Critter::new("e4", "Dark Sprite", 4)
}

fn shadow_wolf() -> Critter {
    Critter::new("e5", "Shadow Wolf", 6)
}

fn swamp_lurker() -> Critter {
    Critter::new("e7", "Swamp Lurker", 8)
}

/// Preset enemy lineups. Total power: easy 7, medium 12, hard 18, brutal 26.
pub fn enemy_lineup(difficulty: Difficulty) -> Vec<Critter> {
    match difficulty {
        Difficulty::Easy => vec![goblin_scout(), dark_sprite()],
        Difficulty::Medium => vec![goblin_scout(), orc_grunt(), dark_sprite()],
        Difficulty::Hard => vec![orc_grunt(), troll_brute(), shadow_wolf()],
        Difficulty::Brutal => vec![troll_brute(), shadow_wolf(), swamp_lurker(), orc_grunt()],
    }
}

/// Default encounter shape: three player slots against a preset lineup.
pub fn demo_config(difficulty: Difficulty) -> EncounterConfig {
    EncounterConfig {
        player_slot_count: 3,
        enemy_critters: enemy_lineup(difficulty),
    }
}

/// Demo encounter with the builtin hand already dealt.
pub fn demo_state(difficulty: Difficulty) -> EncounterState {
    let mut state = EncounterState::new(&demo_config(difficulty));
    state.deal_hand(builtin_critters());
    state
}

/// Load a custom critter roster from a JSON array file.
pub fn load_roster(path: &str) -> Result<Vec<Critter>, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("failed to read {path}: {err}"))?;
    serde_json::from_str(&raw).map_err(|err| format!("invalid roster in {path}: {err}"))
}
