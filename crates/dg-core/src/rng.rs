//! Seeded randomness for a generation pass
//!
//! A pass owns exactly one `DungeonRng` and lends it by `&mut` to every step
//! that draws, so the same seed always replays the same dungeon.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// ChaCha8 stream tagged with the seed it started from
///
/// Serializes as the bare seed; a deserialized value restarts the stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct DungeonRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl From<u64> for DungeonRng {
    fn from(seed: u64) -> Self {
        DungeonRng::new(seed)
    }
}

impl From<DungeonRng> for u64 {
    fn from(rng: DungeonRng) -> u64 {
        rng.seed
    }
}

impl DungeonRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform in `0..n`; 0 when `n` is 0
    pub fn rn2(&mut self, n: u32) -> u32 {
        match n {
            0 => 0,
            n => self.rng.gen_range(0..n),
        }
    }

    /// Uniform in `lo..hi`; `lo` when the range is empty
    pub fn range(&mut self, lo: i32, hi: i32) -> i32 {
        if hi > lo { self.rng.gen_range(lo..hi) } else { lo }
    }

    /// Uniform in `lo..=hi`; `lo` when `hi < lo`
    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi >= lo { self.rng.gen_range(lo..=hi) } else { lo }
    }

    /// Uniform float in `[0, 1)`
    pub fn unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    /// True with probability `p`, clamped to `[0, 1]`
    ///
    /// Consumes one draw whatever `p` is, so tuning a probability never
    /// shifts the draws that follow it.
    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p.clamp(0.0, 1.0)
    }
}
