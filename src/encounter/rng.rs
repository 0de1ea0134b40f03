//! PRNG and the power roll. Uses SplitMix64 for throughput and good statistical quality.
//! Deterministic: same seed produces the same sequence. Not cryptographically secure.
//!
//! `roll_power` is the only source of randomness in the encounter core; every
//! other computation is a pure function of board state.

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

/// Fraction of base power that bounds the roll window: ±25%.
pub const VARIANCE_RATIO: f64 = 0.25;

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }

    /// Uniform draw in `[lo, hi]` inclusive. Requires `lo <= hi`.
    #[inline]
    pub fn next_in_range(&mut self, lo: i64, hi: i64) -> i64 {
        debug_assert!(lo <= hi);
        let span = (hi - lo) as u64 + 1;
        lo + (self.next_u64() % span) as i64
    }
}

/// Realize a critter's power at resolution time: base plus a uniform draw in
/// `[-floor(base * VARIANCE_RATIO), +floor(base * VARIANCE_RATIO)]`, clamped
/// to a minimum of 1.
pub fn roll_power(rng: &mut Rng, base_power: u32) -> i64 {
    let base = i64::from(base_power);
    let variance = (f64::from(base_power) * VARIANCE_RATIO).floor() as i64;
    (base + rng.next_in_range(-variance, variance)).max(1)
}

/// OS-entropy seed for callers that do not care about reproducibility.
/// Falls back to a fixed seed if the entropy source is unavailable.
pub fn seed_from_entropy() -> u64 {
    let mut bytes = [0_u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(_) => 0x7417_c4e7_0000_0001,
    }
}
