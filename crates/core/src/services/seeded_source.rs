use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic input for one pseudo-random draw.
///
/// A seed is derived only from explicit inputs (timestamps, offsets, labels)
/// so any draw can be recomputed anywhere with the same result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed(u64);

impl Seed {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Seed from an epoch-millis timestamp. Zero and negative timestamps are valid.
    pub fn from_timestamp(timestamp: i64) -> Self {
        Self(timestamp as u64)
    }

    /// Seed from a label's character-code sum combined with a magnitude.
    pub fn from_label(label: &str, magnitude: f64) -> Self {
        let label_hash: u64 = label.chars().map(|c| u64::from(u32::from(c))).sum();
        Self(mix(label_hash, magnitude.to_bits()))
    }

    /// Derive a new seed by mixing in a small integer (hour index, slot, salt).
    pub fn with_offset(self, offset: u64) -> Self {
        Self(mix(self.0, offset))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Combine two words so that seeds differing by one land far apart.
fn mix(a: u64, b: u64) -> u64 {
    splitmix64(a ^ splitmix64(b))
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Source of seeded scalar values, injected into every generator.
///
/// Implementations must be pure: the same seed always yields the same value,
/// regardless of call order, thread or process.
pub trait SeededSource: Send + Sync {
    /// A value in `[0, 1)`.
    fn unit(&self, seed: Seed) -> f64;

    /// A value in `[min, max)`.
    fn range(&self, seed: Seed, min: f64, max: f64) -> f64 {
        min + self.unit(seed) * (max - min)
    }

    /// `true` with probability `p`.
    fn chance(&self, seed: Seed, p: f64) -> bool {
        self.unit(seed) < p
    }
}

/// Default source: a fresh `ChaCha8Rng` per draw, seeded from the finalized seed.
///
/// The generator algorithm is fixed, so draws stay the same across builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdSeededSource;

impl SeededSource for StdSeededSource {
    fn unit(&self, seed: Seed) -> f64 {
        ChaCha8Rng::seed_from_u64(splitmix64(seed.0)).gen::<f64>()
    }
}
