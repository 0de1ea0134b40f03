//! Roster state for a single encounter: slots on both sides, the player's hand,
//! and the phase machine. Pure state plus atomic hand<->slot moves; all rule
//! evaluation lives in [crate::encounter::rules] and
//! [crate::encounter::projection].

use serde::{Deserialize, Serialize};

/// A roster-able unit. Immutable value object: moving one between hand and slot
/// moves the value, never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Critter {
    pub id: String,
    pub name: String,
    /// Base value used in every calculation.
    pub power: u32,
    /// Free-text capability descriptor, interpreted by the trait resolver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trait_text: Option<String>,
    /// Excluded from the selectable hand; no effect on calculation.
    #[serde(default)]
    pub exhausted: bool,
}

impl Critter {
    pub fn new(id: &str, name: &str, power: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            power,
            trait_text: None,
            exhausted: false,
        }
    }

    pub fn with_trait(mut self, text: &str) -> Self {
        self.trait_text = Some(text.to_string());
        self
    }

    pub fn exhausted(mut self) -> Self {
        self.exhausted = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

/// A positioned container on one side of the board, holding at most one critter.
/// Slots are created once at encounter setup; count and position never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,
    /// Zero-based ordinal, dense per side. Used for adjacency and "last".
    pub position: usize,
    pub side: Side,
    pub occupant: Option<Critter>,
}

impl Slot {
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Occupant power, 0 for an empty slot.
    pub fn power(&self) -> u32 {
        self.occupant.as_ref().map_or(0, |c| c.power)
    }
}

/// Sole input to initialize the roster model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterConfig {
    pub player_slot_count: usize,
    pub enemy_critters: Vec<Critter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Rostering,
    Resolving,
    Result,
}

/// The single mutable aggregate the encounter core operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterState {
    pub phase: Phase,
    pub player_slots: Vec<Slot>,
    /// Fixed after init from the config lineup.
    pub enemy_slots: Vec<Slot>,
    /// Critters not yet rostered.
    pub hand: Vec<Critter>,
    pub selected_critter_id: Option<String>,
}

impl EncounterState {
    /// Pure constructor. Player slots start empty; enemy slots are pre-filled
    /// from the config lineup in order. The hand starts empty; see [deal_hand].
    ///
    /// [deal_hand]: EncounterState::deal_hand
    pub fn new(config: &EncounterConfig) -> Self {
        let player_slots = (0..config.player_slot_count)
            .map(|i| Slot {
                id: format!("player-{i}"),
                position: i,
                side: Side::Player,
                occupant: None,
            })
            .collect();
        let enemy_slots = config
            .enemy_critters
            .iter()
            .enumerate()
            .map(|(i, critter)| Slot {
                id: format!("enemy-{i}"),
                position: i,
                side: Side::Enemy,
                occupant: Some(critter.clone()),
            })
            .collect();
        Self {
            phase: Phase::Rostering,
            player_slots,
            enemy_slots,
            hand: Vec::new(),
            selected_critter_id: None,
        }
    }

    /// Replace the hand with the selectable subset of `critters` (exhausted
    /// critters are filtered out). No-op outside the rostering phase.
    pub fn deal_hand(&mut self, critters: Vec<Critter>) {
        if self.phase != Phase::Rostering {
            return;
        }
        self.hand = critters.into_iter().filter(|c| !c.exhausted).collect();
        self.selected_critter_id = None;
    }

    /// Move a hand critter into an empty player slot. Silent no-op (returns
    /// `false`) when the slot is occupied or unknown, the critter is not in the
    /// hand, or the phase is not rostering. Not an error by design.
    pub fn roster(&mut self, slot_id: &str, critter_id: &str) -> bool {
        if self.phase != Phase::Rostering {
            return false;
        }
        let Some(slot_index) = self
            .player_slots
            .iter()
            .position(|s| s.id == slot_id && s.occupant.is_none())
        else {
            return false;
        };
        let Some(hand_index) = self.hand.iter().position(|c| c.id == critter_id) else {
            return false;
        };
        let critter = self.hand.remove(hand_index);
        self.player_slots[slot_index].occupant = Some(critter);
        if self.selected_critter_id.as_deref() == Some(critter_id) {
            self.selected_critter_id = None;
        }
        true
    }

    /// Move a slot occupant back to the hand. Silent no-op (returns `false`)
    /// when the slot is empty or unknown, or the phase is not rostering.
    pub fn unroster(&mut self, slot_id: &str) -> bool {
        if self.phase != Phase::Rostering {
            return false;
        }
        let Some(slot) = self
            .player_slots
            .iter_mut()
            .find(|s| s.id == slot_id && s.occupant.is_some())
        else {
            return false;
        };
        if let Some(critter) = slot.occupant.take() {
            self.hand.push(critter);
        }
        true
    }

    /// Toggle the hand selection. Selecting an id not present in the hand
    /// clears the selection.
    pub fn toggle_selection(&mut self, critter_id: &str) {
        if self.selected_critter_id.as_deref() == Some(critter_id)
            || !self.hand.iter().any(|c| c.id == critter_id)
        {
            self.selected_critter_id = None;
        } else {
            self.selected_critter_id = Some(critter_id.to_string());
        }
    }

    pub fn has_rostered(&self) -> bool {
        self.player_slots.iter().any(Slot::is_occupied)
    }

    pub fn slots(&self, side: Side) -> &[Slot] {
        match side {
            Side::Player => &self.player_slots,
            Side::Enemy => &self.enemy_slots,
        }
    }

    /// Transition `Resolving` -> `Result` once a resolution run has completed.
    /// No-op in any other phase.
    pub fn finish_resolution(&mut self) {
        if self.phase == Phase::Resolving {
            self.phase = Phase::Result;
        }
    }
}

/// Count of occupied slots on one side.
pub fn occupied_count(slots: &[Slot]) -> usize {
    slots.iter().filter(|s| s.is_occupied()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_slot_state() -> EncounterState {
        let config = EncounterConfig {
            player_slot_count: 2,
            enemy_critters: vec![Critter::new("e1", "Goblin Scout", 3)],
        };
        let mut state = EncounterState::new(&config);
        state.deal_hand(vec![
            Critter::new("c1", "Forest Fox", 5),
            Critter::new("c2", "Mountain Bear", 8).exhausted(),
        ]);
        state
    }

    #[test]
    fn new_lays_out_dense_positions_per_side() {
        let state = two_slot_state();
        assert_eq!(state.player_slots.len(), 2);
        assert_eq!(state.enemy_slots.len(), 1);
        for (i, slot) in state.player_slots.iter().enumerate() {
            assert_eq!(slot.position, i);
            assert_eq!(slot.side, Side::Player);
            assert!(slot.occupant.is_none());
        }
        assert!(state.enemy_slots[0].is_occupied());
    }

    #[test]
    fn deal_hand_filters_exhausted_critters() {
        let state = two_slot_state();
        assert_eq!(state.hand.len(), 1);
        assert_eq!(state.hand[0].id, "c1");
    }

    #[test]
    fn roster_moves_critter_out_of_hand() {
        let mut state = two_slot_state();
        assert!(state.roster("player-0", "c1"));
        assert!(state.hand.is_empty());
        assert_eq!(state.player_slots[0].occupant.as_ref().unwrap().id, "c1");
    }

    #[test]
    fn roster_into_occupied_slot_is_silent_noop() {
        let mut state = two_slot_state();
        state.roster("player-0", "c1");
        let before = state.clone();
        assert!(!state.roster("player-0", "c1"));
        assert_eq!(state, before);
    }

    #[test]
    fn unroster_empty_slot_is_silent_noop() {
        let mut state = two_slot_state();
        let before = state.clone();
        assert!(!state.unroster("player-1"));
        assert_eq!(state, before);
    }

    #[test]
    fn unroster_returns_critter_to_hand() {
        let mut state = two_slot_state();
        state.roster("player-0", "c1");
        assert!(state.unroster("player-0"));
        assert_eq!(state.hand.len(), 1);
        assert!(!state.player_slots[0].is_occupied());
    }

    #[test]
    fn toggle_selection_roundtrip() {
        let mut state = two_slot_state();
        state.toggle_selection("c1");
        assert_eq!(state.selected_critter_id.as_deref(), Some("c1"));
        state.toggle_selection("c1");
        assert_eq!(state.selected_critter_id, None);
        state.toggle_selection("not-a-critter");
        assert_eq!(state.selected_critter_id, None);
    }

    #[test]
    fn moves_are_rejected_outside_rostering() {
        let mut state = two_slot_state();
        state.phase = Phase::Resolving;
        assert!(!state.roster("player-0", "c1"));
        assert!(!state.unroster("player-0"));
        state.finish_resolution();
        assert_eq!(state.phase, Phase::Result);
        state.finish_resolution();
        assert_eq!(state.phase, Phase::Result);
    }
}
