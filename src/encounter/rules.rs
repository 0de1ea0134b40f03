//! Trait interpretation: free-text descriptors are classified into a tagged
//! rule, then resolved against the board into concrete bonuses.
//!
//! Self-granting rules are checked in a fixed priority order and at most one
//! applies per slot. Adjacency grants are evaluated independently of that chain
//! and stack, one entry per qualifying neighbor. Text that matches no rule
//! contributes zero bonus; there is no error path.

use serde::{Deserialize, Serialize};

use crate::encounter::model::{occupied_count, Side, Slot};

/// A computed bonus contribution. Never stored: recomputed from board state on
/// every projection request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitBonus {
    /// Name of the contributing critter.
    pub source: String,
    pub amount: i64,
    /// Display-only explanation, e.g. "+1 from Forest Fox (Adjacent)".
    pub description: String,
}

/// Classified trait. Variants mirror the priority chain; classification order
/// is what makes first-match-wins auditable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitKind {
    /// Grants `amount` to each adjacent critter; no self bonus.
    AdjacencyGrant { amount: i64 },
    /// Flat `amount` whenever slotted; the critter exhausts after the encounter.
    FlatExhaust { amount: i64 },
    /// Adds own base power when the enemy side has exactly one occupied slot.
    DoubleVsLoneEnemy,
    /// `amount` when occupying the highest occupied player position.
    WhenLast { amount: i64 },
    /// `amount` when occupied player slots < occupied enemy slots.
    WhenOutnumbered { amount: i64 },
}

/// First integer preceded by a `+` anywhere in the text.
pub fn leading_bonus_amount(text: &str) -> Option<i64> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'+' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end > start {
                return text[start..end].parse().ok();
            }
        }
        i += 1;
    }
    None
}

/// Match trait text against the known phrase patterns, highest priority first.
/// Case-insensitive substring checks; unrecognized text is `None`.
pub fn classify_trait(text: &str) -> Option<TraitKind> {
    let lower = text.to_lowercase();
    let amount = leading_bonus_amount(&lower);

    if lower.contains("adjacent critter") {
        return Some(TraitKind::AdjacencyGrant {
            amount: amount.unwrap_or(1),
        });
    }
    if lower.contains("exhaust") {
        if let Some(amount) = amount {
            return Some(TraitKind::FlatExhaust { amount });
        }
    }
    if lower.contains("double") && lower.contains("single enemy") {
        return Some(TraitKind::DoubleVsLoneEnemy);
    }
    if lower.contains("last") {
        if let Some(amount) = amount {
            return Some(TraitKind::WhenLast { amount });
        }
    }
    if lower.contains("outnumbered") {
        if let Some(amount) = amount {
            return Some(TraitKind::WhenOutnumbered { amount });
        }
    }
    None
}

fn self_bonus(slot: &Slot, player_slots: &[Slot], enemy_slots: &[Slot]) -> Option<TraitBonus> {
    let critter = slot.occupant.as_ref()?;
    let kind = classify_trait(critter.trait_text.as_deref()?)?;

    match kind {
        // Provider only; resolved from each neighbor's perspective below.
        TraitKind::AdjacencyGrant { .. } => None,
        TraitKind::FlatExhaust { amount } => Some(TraitBonus {
            source: critter.name.clone(),
            amount,
            description: format!("+{amount} from {} (Exhausting)", critter.name),
        }),
        TraitKind::DoubleVsLoneEnemy => {
            if occupied_count(enemy_slots) == 1 {
                Some(TraitBonus {
                    source: critter.name.clone(),
                    amount: i64::from(critter.power),
                    description: format!("x2 from {} (Single Enemy)", critter.name),
                })
            } else {
                None
            }
        }
        TraitKind::WhenLast { amount } => {
            let last_occupied = player_slots
                .iter()
                .filter(|s| s.is_occupied())
                .map(|s| s.position)
                .max()?;
            if slot.position == last_occupied {
                Some(TraitBonus {
                    source: critter.name.clone(),
                    amount,
                    description: format!("+{amount} from {} (Last Position)", critter.name),
                })
            } else {
                None
            }
        }
        TraitKind::WhenOutnumbered { amount } => {
            if occupied_count(player_slots) < occupied_count(enemy_slots) {
                Some(TraitBonus {
                    source: critter.name.clone(),
                    amount,
                    description: format!("+{amount} from {} (Outnumbered)", critter.name),
                })
            } else {
                None
            }
        }
    }
}

fn adjacency_bonuses(slot: &Slot, player_slots: &[Slot]) -> Vec<TraitBonus> {
    let mut bonuses = Vec::new();
    for neighbor in player_slots {
        if neighbor.position.abs_diff(slot.position) != 1 {
            continue;
        }
        let Some(critter) = neighbor.occupant.as_ref() else {
            continue;
        };
        let Some(text) = critter.trait_text.as_deref() else {
            continue;
        };
        if let Some(TraitKind::AdjacencyGrant { amount }) = classify_trait(text) {
            bonuses.push(TraitBonus {
                source: critter.name.clone(),
                amount,
                description: format!("+{amount} from {} (Adjacent)", critter.name),
            });
        }
    }
    bonuses
}

/// All bonuses the occupant of `slot` receives from the current board: at most
/// one self bonus (priority chain) followed by one adjacency bonus per
/// qualifying neighbor. Enemy slots never receive or grant trait bonuses.
/// Pure function of board state.
pub fn resolve_slot_bonuses(
    slot: &Slot,
    player_slots: &[Slot],
    enemy_slots: &[Slot],
) -> Vec<TraitBonus> {
    if slot.side == Side::Enemy || !slot.is_occupied() {
        return Vec::new();
    }
    let mut bonuses = Vec::new();
    if let Some(bonus) = self_bonus(slot, player_slots, enemy_slots) {
        bonuses.push(bonus);
    }
    bonuses.extend(adjacency_bonuses(slot, player_slots));
    bonuses
}
