//! Static pre-roll power projections, recomputed from board state on every
//! request. Advisory only: the resolved outcome comes from the sequencer's
//! rolls, which vary around these numbers.

use serde::Serialize;

use crate::encounter::model::{Side, Slot};
use crate::encounter::rules::{resolve_slot_bonuses, TraitBonus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotProjection {
    pub base_value: i64,
    pub bonuses: Vec<TraitBonus>,
    pub total_value: i64,
}

/// Projection for one slot: occupant power (0 if empty) plus resolved bonuses.
/// Enemy slots always project an empty bonus list.
pub fn project_slot(slot: &Slot, player_slots: &[Slot], enemy_slots: &[Slot]) -> SlotProjection {
    let base_value = i64::from(slot.power());
    let bonuses = if slot.side == Side::Player {
        resolve_slot_bonuses(slot, player_slots, enemy_slots)
    } else {
        Vec::new()
    };
    let total_value = base_value + bonuses.iter().map(|b| b.amount).sum::<i64>();
    SlotProjection {
        base_value,
        bonuses,
        total_value,
    }
}

/// Sum of slot projections over one side.
pub fn project_team(slots: &[Slot], player_slots: &[Slot], enemy_slots: &[Slot]) -> i64 {
    slots
        .iter()
        .map(|slot| project_slot(slot, player_slots, enemy_slots).total_value)
        .sum()
}
