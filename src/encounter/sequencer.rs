//! Stepwise resolution: walks every occupied slot in a fixed order, rolls each
//! occupant's power, reveals its trait bonuses, and accumulates running totals
//! into the final [EncounterResult].
//!
//! The run is held as explicitly resumable state (a cursor plus accumulators),
//! so "skip" is implemented as running the same per-step function synchronously
//! for every remaining step. Each slot's roll is drawn exactly once on either
//! path, which makes the skipped result identical to the uninterrupted one for
//! a given seed. Cancellation is cooperative: it is polled only at the pacing
//! delays between steps, never inside a step.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

use crate::encounter::model::{EncounterState, Phase, Side};
use crate::encounter::outcome::{evaluate, EncounterResult};
use crate::encounter::rng::{roll_power, Rng};
use crate::encounter::rules::{resolve_slot_bonuses, TraitBonus};
use crate::pacing::PacingTimings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Roll,
    Bonus,
}

/// One reveal in the resolution sequence. The stream of these is everything a
/// presentation layer needs to reconstruct the animation: which slot acted,
/// what was added, the running total after the addition, and a display
/// annotation for floating labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepEvent {
    pub slot_id: String,
    pub side: Side,
    pub kind: StepKind,
    pub amount: i64,
    pub running_total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
struct PlannedSlot {
    slot_id: String,
    side: Side,
    power: u32,
    /// Resolved once against the static board; revealed incrementally.
    bonuses: Vec<TraitBonus>,
}

/// Resumable resolution state. Totals here are transient: a new run resets
/// them, and nothing outside the run accumulates score.
#[derive(Debug, Clone)]
pub struct ResolutionRun {
    slots: Vec<PlannedSlot>,
    slot_index: usize,
    /// `None`: the next step is the roll for `slots[slot_index]`.
    /// `Some(i)`: the next step reveals bonus `i` of that slot.
    bonus_index: Option<usize>,
    player_total: i64,
    enemy_total: i64,
    rng: Rng,
}

impl ResolutionRun {
    /// Snapshot the occupied slots in processing order: players by ascending
    /// position, then enemies by ascending position. Bonuses are resolved here,
    /// once per slot, against the static board; enemy slots never carry any.
    pub fn new(state: &EncounterState, seed: u64) -> Self {
        let mut slots = Vec::new();
        for slot in state.player_slots.iter().filter(|s| s.is_occupied()) {
            slots.push(PlannedSlot {
                slot_id: slot.id.clone(),
                side: Side::Player,
                power: slot.power(),
                bonuses: resolve_slot_bonuses(slot, &state.player_slots, &state.enemy_slots),
            });
        }
        for slot in state.enemy_slots.iter().filter(|s| s.is_occupied()) {
            slots.push(PlannedSlot {
                slot_id: slot.id.clone(),
                side: Side::Enemy,
                power: slot.power(),
                bonuses: Vec::new(),
            });
        }
        Self {
            slots,
            slot_index: 0,
            bonus_index: None,
            player_total: 0,
            enemy_total: 0,
            rng: Rng::new(seed),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.slot_index >= self.slots.len()
    }

    /// True when the next step (if any) starts a fresh slot.
    pub fn at_slot_boundary(&self) -> bool {
        self.bonus_index.is_none()
    }

    /// Commit the next step and return its event, or `None` when the run is
    /// complete. A step is atomic: once its amount is in the totals it is never
    /// re-drawn or un-committed.
    pub fn advance(&mut self) -> Option<StepEvent> {
        if self.is_complete() {
            return None;
        }
        let slot_id = self.slots[self.slot_index].slot_id.clone();
        let side = self.slots[self.slot_index].side;

        match self.bonus_index {
            None => {
                let power = self.slots[self.slot_index].power;
                let amount = roll_power(&mut self.rng, power);
                let running_total = match side {
                    Side::Player => {
                        self.player_total += amount;
                        self.player_total
                    }
                    Side::Enemy => {
                        self.enemy_total += amount;
                        self.enemy_total
                    }
                };
                let luck = amount - i64::from(power);
                let description = if luck > 0 {
                    Some("Lucky roll!".to_string())
                } else if luck < 0 {
                    Some("Unlucky...".to_string())
                } else {
                    None
                };
                if self.slots[self.slot_index].bonuses.is_empty() {
                    self.slot_index += 1;
                } else {
                    self.bonus_index = Some(0);
                }
                Some(StepEvent {
                    slot_id,
                    side,
                    kind: StepKind::Roll,
                    amount,
                    running_total,
                    description,
                })
            }
            Some(i) => {
                let bonus = self.slots[self.slot_index].bonuses[i].clone();
                // Bonuses exist on player slots only.
                self.player_total += bonus.amount;
                if i + 1 < self.slots[self.slot_index].bonuses.len() {
                    self.bonus_index = Some(i + 1);
                } else {
                    self.bonus_index = None;
                    self.slot_index += 1;
                }
                Some(StepEvent {
                    slot_id,
                    side,
                    kind: StepKind::Bonus,
                    amount: bonus.amount,
                    running_total: self.player_total,
                    description: Some(bonus.description),
                })
            }
        }
    }

    /// Run every remaining step synchronously. This is the skip path.
    pub fn finish(&mut self) -> Vec<StepEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.advance() {
            events.push(event);
        }
        events
    }

    pub fn totals(&self) -> (i64, i64) {
        (self.player_total, self.enemy_total)
    }

    pub fn result(&self) -> EncounterResult {
        evaluate(self.player_total, self.enemy_total)
    }
}

/// Resolve a state to completion with no pacing at all. Read-only with respect
/// to `state`; used by tests, odds sampling, and the CLI.
pub fn resolve_instantly(state: &EncounterState, seed: u64) -> (Vec<StepEvent>, EncounterResult) {
    let mut run = ResolutionRun::new(state, seed);
    let events = run.finish();
    (events, run.result())
}

/// Handle to an in-flight resolution. Dropping the handle without `join` leaves
/// the task running; call [abort](ResolutionHandle::abort) on teardown to
/// cancel the outstanding timer.
pub struct ResolutionHandle {
    pub run_id: Uuid,
    skip: Arc<Notify>,
    events: Option<UnboundedReceiverStream<StepEvent>>,
    task: JoinHandle<EncounterResult>,
}

impl ResolutionHandle {
    /// The step event stream. Yields each event as it is committed; can be
    /// taken once.
    pub fn events(&mut self) -> Option<UnboundedReceiverStream<StepEvent>> {
        self.events.take()
    }

    /// Request cancellation of the remaining pacing. The task resolves every
    /// unprocessed step synchronously and completes with a result numerically
    /// identical to an uninterrupted run. No-op once the run has completed.
    pub fn skip(&self) {
        self.skip.notify_one();
    }

    /// Await completion. `None` only if the task was aborted.
    pub async fn join(self) -> Option<EncounterResult> {
        self.task.await.ok()
    }

    /// Tear down the run and its pending timer. The encounter state is left in
    /// `Resolving`; callers abandoning an encounter mid-animation discard it.
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Start the paced resolution for `state`. Guarded entry: returns `None`
/// unless the phase is `Rostering` and at least one player slot is occupied,
/// which also makes re-entry while resolving a no-op. On success the phase
/// flips to `Resolving`; call [EncounterState::finish_resolution] after
/// joining the handle.
pub fn begin_resolution(
    state: &mut EncounterState,
    pacing: &PacingTimings,
    seed: u64,
) -> Option<ResolutionHandle> {
    if state.phase != Phase::Rostering || !state.has_rostered() {
        return None;
    }
    state.phase = Phase::Resolving;

    let mut run = ResolutionRun::new(state, seed);
    let pacing = pacing.clone();
    let (sender, receiver) = mpsc::unbounded_channel();
    let skip = Arc::new(Notify::new());
    let skip_signal = Arc::clone(&skip);

    let task = tokio::spawn(async move {
        let mut skipped = false;
        while let Some(event) = run.advance() {
            let mut delay = match (event.side, event.kind) {
                (Side::Player, StepKind::Roll) => pacing.roll_delay,
                (Side::Player, StepKind::Bonus) => pacing.trait_bonus_delay,
                (Side::Enemy, _) => pacing.enemy_roll_delay,
            };
            if event.side == Side::Player && run.at_slot_boundary() {
                delay += pacing.critter_pause_delay;
            }
            // Receiver may be gone if the caller only wants the result.
            let _ = sender.send(event);
            if run.is_complete() {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = skip_signal.notified() => {
                    skipped = true;
                    break;
                }
            }
        }
        if skipped {
            for event in run.finish() {
                let _ = sender.send(event);
            }
        } else {
            tokio::select! {
                _ = tokio::time::sleep(pacing.final_reveal_delay) => {}
                _ = skip_signal.notified() => {}
            }
        }
        run.result()
    });

    Some(ResolutionHandle {
        run_id: Uuid::new_v4(),
        skip,
        events: Some(UnboundedReceiverStream::new(receiver)),
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::roster::{builtin_critters, demo_config, Difficulty};

    fn rostered_state() -> EncounterState {
        let mut state = EncounterState::new(&demo_config(Difficulty::Medium));
        state.deal_hand(builtin_critters());
        state.roster("player-0", "c3");
        state.roster("player-1", "c1");
        state
    }

    #[test]
    fn advance_walks_players_then_enemies_in_position_order() {
        let state = rostered_state();
        let (events, _) = resolve_instantly(&state, 7);
        let slot_order: Vec<&str> = events
            .iter()
            .filter(|e| e.kind == StepKind::Roll)
            .map(|e| e.slot_id.as_str())
            .collect();
        assert_eq!(
            slot_order,
            vec!["player-0", "player-1", "enemy-0", "enemy-1", "enemy-2"]
        );
    }

    #[test]
    fn bonus_events_follow_their_slot_roll() {
        let state = rostered_state();
        let (events, _) = resolve_instantly(&state, 7);
        // Otter in slot 0 is adjacent to the fox in slot 1: roll then +1 bonus.
        assert_eq!(events[0].kind, StepKind::Roll);
        assert_eq!(events[0].slot_id, "player-0");
        assert_eq!(events[1].kind, StepKind::Bonus);
        assert_eq!(events[1].slot_id, "player-0");
        assert_eq!(events[1].amount, 1);
    }

    #[test]
    fn running_totals_are_cumulative_per_side() {
        let state = rostered_state();
        let (events, result) = resolve_instantly(&state, 21);
        let mut player = 0;
        let mut enemy = 0;
        for event in &events {
            match event.side {
                Side::Player => {
                    player += event.amount;
                    assert_eq!(event.running_total, player);
                }
                Side::Enemy => {
                    enemy += event.amount;
                    assert_eq!(event.running_total, enemy);
                }
            }
        }
        assert_eq!(result.player_score, player);
        assert_eq!(result.enemy_score, enemy);
    }

    #[test]
    fn skip_at_every_step_matches_uninterrupted_run() {
        let state = rostered_state();
        let seed = 1234;
        let (full_events, full_result) = resolve_instantly(&state, seed);

        for interrupt_after in 0..=full_events.len() {
            let mut run = ResolutionRun::new(&state, seed);
            let mut events = Vec::new();
            for _ in 0..interrupt_after {
                events.push(run.advance().expect("step available"));
            }
            events.extend(run.finish());
            assert_eq!(events, full_events, "skip after step {interrupt_after}");
            assert_eq!(run.result(), full_result);
        }
    }

    #[test]
    fn empty_roster_resolves_to_zero_zero_tie() {
        let config = crate::encounter::model::EncounterConfig {
            player_slot_count: 2,
            enemy_critters: Vec::new(),
        };
        let state = EncounterState::new(&config);
        let (events, result) = resolve_instantly(&state, 1);
        assert!(events.is_empty());
        assert!(result.victory);
        assert_eq!((result.player_score, result.enemy_score), (0, 0));
    }

    #[tokio::test]
    async fn begin_resolution_guards_phase_and_roster() {
        let mut empty = EncounterState::new(&demo_config(Difficulty::Easy));
        assert!(begin_resolution(&mut empty, &PacingTimings::zero(), 1).is_none());
        assert_eq!(empty.phase, Phase::Rostering);

        let mut state = rostered_state();
        state.phase = Phase::Resolving;
        assert!(begin_resolution(&mut state, &PacingTimings::zero(), 1).is_none());
    }

    #[tokio::test]
    async fn paced_run_matches_instant_resolution() {
        use futures_util::StreamExt;

        let mut state = rostered_state();
        let (instant_events, instant_result) = resolve_instantly(&state, 77);

        let mut handle =
            begin_resolution(&mut state, &PacingTimings::zero(), 77).expect("resolution starts");
        assert_eq!(state.phase, Phase::Resolving);
        let stream = handle.events().expect("stream available");
        let result = handle.join().await.expect("not aborted");
        let events: Vec<StepEvent> = stream.collect().await;

        assert_eq!(events, instant_events);
        assert_eq!(result, instant_result);

        state.finish_resolution();
        assert_eq!(state.phase, Phase::Result);
    }

    #[tokio::test]
    async fn skip_mid_run_still_emits_every_step() {
        use futures_util::StreamExt;

        let mut state = rostered_state();
        let (instant_events, instant_result) = resolve_instantly(&state, 99);

        // Slow pacing so the first delay is still pending when we skip.
        let pacing = PacingTimings::from_millis(60_000, 60_000, 0, 60_000, 0, 0);
        let mut handle = begin_resolution(&mut state, &pacing, 99).expect("resolution starts");
        let stream = handle.events().expect("stream available");
        handle.skip();
        let result = handle.join().await.expect("not aborted");
        let events: Vec<StepEvent> = stream.collect().await;

        assert_eq!(events, instant_events);
        assert_eq!(result, instant_result);
    }

    #[tokio::test]
    async fn abort_cancels_the_pending_timer() {
        let mut state = rostered_state();
        let pacing = PacingTimings::from_millis(60_000, 60_000, 0, 60_000, 0, 0);
        let handle = begin_resolution(&mut state, &pacing, 5).expect("resolution starts");
        handle.abort();
        assert!(handle.join().await.is_none());
    }

    #[test]
    fn pacing_table_never_affects_the_outcome() {
        // Same seed under different tables: the paced driver and the instant
        // path share ResolutionRun, so only wall-clock cadence can differ.
        let state = rostered_state();
        let (_, baseline) = resolve_instantly(&state, 4242);
        for _ in 0..3 {
            let (_, again) = resolve_instantly(&state, 4242);
            assert_eq!(again, baseline);
        }
    }
}
