//! Final score comparison.

use serde::{Deserialize, Serialize};

/// Terminal value of an encounter: concrete post-roll totals, not projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterResult {
    pub player_score: i64,
    pub enemy_score: i64,
    pub victory: bool,
}

/// Ties favor the player (`>=`). Confirmed design choice; do not tighten to
/// strict superiority.
pub fn evaluate(player_total: i64, enemy_total: i64) -> EncounterResult {
    EncounterResult {
        player_score: player_total,
        enemy_score: enemy_total,
        victory: player_total >= enemy_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tie_counts_as_victory() {
        assert!(evaluate(10, 10).victory);
    }

    #[test]
    fn strict_comparison_both_ways() {
        assert!(evaluate(11, 10).victory);
        assert!(!evaluate(9, 10).victory);
    }
}
