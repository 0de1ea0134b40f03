//! Pacing tables for the resolution sequencer. Timing only: no value in here
//! may influence which rolls are drawn, which bonuses apply, or the final
//! totals. Swapping tables is observationally invisible except for wall-clock
//! cadence.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacingPreset {
    Slow,
    Medium,
    Fast,
    Instant,
}

impl PacingPreset {
    pub const ALL: [PacingPreset; 4] = [
        PacingPreset::Slow,
        PacingPreset::Medium,
        PacingPreset::Fast,
        PacingPreset::Instant,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "slow" => Some(Self::Slow),
            "medium" => Some(Self::Medium),
            "fast" => Some(Self::Fast),
            "instant" => Some(Self::Instant),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Medium => "medium",
            Self::Fast => "fast",
            Self::Instant => "instant",
        }
    }

    pub fn timings(self) -> PacingTimings {
        match self {
            Self::Slow => PacingTimings::from_millis(800, 700, 400, 700, 600, 1500),
            Self::Medium => PacingTimings::from_millis(400, 500, 200, 500, 300, 1200),
            Self::Fast => PacingTimings::from_millis(200, 250, 100, 250, 150, 800),
            Self::Instant => PacingTimings::from_millis(50, 50, 50, 50, 50, 400),
        }
    }
}

/// Named delay table consumed verbatim by the sequencer between steps.
/// Serialized as milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingTimings {
    /// Delay after a player roll step.
    #[serde(with = "duration_ms")]
    pub roll_delay: Duration,
    /// Delay between successive trait bonus reveals.
    #[serde(with = "duration_ms")]
    pub trait_bonus_delay: Duration,
    /// Pause after a player slot finishes, before the next slot.
    #[serde(with = "duration_ms")]
    pub critter_pause_delay: Duration,
    /// Delay after an enemy roll step.
    #[serde(with = "duration_ms")]
    pub enemy_roll_delay: Duration,
    /// Pause before the final result is reported.
    #[serde(with = "duration_ms")]
    pub final_reveal_delay: Duration,
    /// Display-side hint: how long a floating annotation should live. Not used
    /// by the sequencer itself; forwarded so shells can time label cleanup.
    #[serde(with = "duration_ms")]
    pub floating_label_duration: Duration,
}

impl PacingTimings {
    pub fn from_millis(
        roll: u64,
        trait_bonus: u64,
        critter_pause: u64,
        enemy_roll: u64,
        final_reveal: u64,
        floating_label: u64,
    ) -> Self {
        Self {
            roll_delay: Duration::from_millis(roll),
            trait_bonus_delay: Duration::from_millis(trait_bonus),
            critter_pause_delay: Duration::from_millis(critter_pause),
            enemy_roll_delay: Duration::from_millis(enemy_roll),
            final_reveal_delay: Duration::from_millis(final_reveal),
            floating_label_duration: Duration::from_millis(floating_label),
        }
    }

    /// All-zero table. Lets outcome-affecting code run under test with no
    /// delays and no duplicated logic path.
    pub fn zero() -> Self {
        Self::from_millis(0, 0, 0, 0, 0, 0)
    }
}

impl Default for PacingTimings {
    fn default() -> Self {
        PacingPreset::Medium.timings()
    }
}

/// Load a pacing override from a JSON file. Returns the default table if the
/// file is missing or invalid.
pub fn load_pacing(path: &str) -> PacingTimings {
    let path = Path::new(path);
    if !path.exists() {
        return PacingTimings::default();
    }
    let raw = match fs::read_to_string(path) {
        Ok(s) => s,
        _ => return PacingTimings::default(),
    };
    serde_json::from_str(&raw).unwrap_or_default()
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
