//! Pre-resolution win-probability estimation: repeated instant resolutions of
//! the same board under per-iteration seeds. Read-only with respect to the
//! encounter state, so projections are unaffected.

use rayon::prelude::*;
use serde::Serialize;

use crate::encounter::model::EncounterState;
use crate::encounter::sequencer::resolve_instantly;
use crate::parallel::{batch_ranges, WorkerPool};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OddsEstimate {
    pub win_rate: f64,
    /// Mean of (player score - enemy score) across iterations.
    pub avg_margin: f64,
    pub iterations: usize,
}

fn sample_range(state: &EncounterState, seed: u64, range: (usize, usize)) -> (usize, i64) {
    let mut wins = 0_usize;
    let mut margin_sum = 0_i64;
    for i in range.0..range.1 {
        let iteration_seed = seed.wrapping_add(i as u64);
        let (_, result) = resolve_instantly(state, iteration_seed);
        if result.victory {
            wins += 1;
        }
        margin_sum += result.player_score - result.enemy_score;
    }
    (wins, margin_sum)
}

fn estimate_from_samples(samples: Vec<(usize, i64)>, iterations: usize) -> OddsEstimate {
    let wins: usize = samples.iter().map(|s| s.0).sum();
    let margin_sum: i64 = samples.iter().map(|s| s.1).sum();
    if iterations == 0 {
        return OddsEstimate {
            win_rate: 0.0,
            avg_margin: 0.0,
            iterations: 0,
        };
    }
    OddsEstimate {
        win_rate: wins as f64 / iterations as f64,
        avg_margin: margin_sum as f64 / iterations as f64,
        iterations,
    }
}

/// Sequential estimate. Seeds are `seed + i`, so the estimate is fully
/// reproducible for a given seed.
pub fn estimate_odds(state: &EncounterState, iterations: usize, seed: u64) -> OddsEstimate {
    let samples = vec![sample_range(state, seed, (0, iterations))];
    estimate_from_samples(samples, iterations)
}

/// Like [estimate_odds] but distributed over `pool`. Per-iteration seeding
/// makes the result independent of worker count and batch layout.
pub fn estimate_odds_parallel(
    state: &EncounterState,
    iterations: usize,
    seed: u64,
    pool: &WorkerPool,
) -> OddsEstimate {
    let batches = batch_ranges(iterations, pool.effective_workers().max(1) * 4);
    let samples = pool.install(|| {
        batches
            .par_iter()
            .map(|range| sample_range(state, seed, *range))
            .collect::<Vec<_>>()
    });
    estimate_from_samples(samples, iterations)
}
