//! Measure instant resolution throughput and sequential vs parallel odds
//! estimation.
//!
//! Run with: `cargo bench --bench resolution`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use thicket::data::roster::{demo_state, Difficulty};
use thicket::encounter::model::EncounterState;
use thicket::encounter::odds::{estimate_odds, estimate_odds_parallel};
use thicket::encounter::sequencer::resolve_instantly;
use thicket::parallel::WorkerPool;

fn rostered_state() -> EncounterState {
    let mut state = demo_state(Difficulty::Brutal);
    state.roster("player-0", "c3");
    state.roster("player-1", "c1");
    state.roster("player-2", "c6");
    state
}

fn bench_instant_resolution(c: &mut Criterion) {
    let state = rostered_state();
    c.bench_function("resolve_instantly", |b| {
        let mut seed = 0_u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            black_box(resolve_instantly(&state, seed))
        });
    });
}

fn bench_odds_sequential_vs_parallel(c: &mut Criterion) {
    let state = rostered_state();
    let iterations = 2_000;
    let seed = 42_u64;
    let pool = WorkerPool::default_workers();

    let mut group = c.benchmark_group("odds");
    group.sample_size(20);
    group.measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("sequential", |b| {
        b.iter(|| black_box(estimate_odds(&state, iterations, seed)));
    });

    group.bench_function("parallel", |b| {
        b.iter(|| black_box(estimate_odds_parallel(&state, iterations, seed, &pool)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_instant_resolution,
    bench_odds_sequential_vs_parallel
);
criterion_main!(benches);
