pub mod export;
pub mod model;
pub mod odds;
pub mod outcome;
pub mod projection;
pub mod rng;
pub mod rules;
pub mod sequencer;

pub use export::{serialize_steps_json, write_steps_csv};
pub use model::{occupied_count, Critter, EncounterConfig, EncounterState, Phase, Side, Slot};
pub use odds::{estimate_odds, estimate_odds_parallel, OddsEstimate};
pub use outcome::{evaluate, EncounterResult};
pub use projection::{project_slot, project_team, SlotProjection};
pub use rng::{roll_power, seed_from_entropy, Rng, VARIANCE_RATIO};
pub use rules::{classify_trait, leading_bonus_amount, resolve_slot_bonuses, TraitBonus, TraitKind};
pub use sequencer::{
    begin_resolution, resolve_instantly, ResolutionHandle, ResolutionRun, StepEvent, StepKind,
};
