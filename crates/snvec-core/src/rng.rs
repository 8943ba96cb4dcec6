//! Deterministic RNG wrapper, the [`RandomSource`] seam and seed-derivation helpers.

use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Poisson};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Source of the two kinds of random numbers the generator consumes.
///
/// A run owns exactly one source and draws from it sequentially, so the
/// order of calls is part of the reproducibility contract.
pub trait RandomSource {
    /// Returns a real drawn uniformly from `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;

    /// Returns a Poisson-distributed count with the given mean.
    ///
    /// Means that are not strictly positive and finite yield zero.
    fn poisson(&mut self, mean: f64) -> u64;
}

/// Seeded `StdRng` implementing [`RandomSource`].
///
/// Per-mode streams are seeded with [`derive_substream_seed`], which hashes
/// `(master_seed, substream)` with zero-keyed SipHash-1-3.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Creates a new RNG handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for RngHandle {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.rng.gen::<f64>()
    }

    fn poisson(&mut self, mean: f64) -> u64 {
        if !(mean > 0.0) || !mean.is_finite() {
            return 0;
        }
        match Poisson::new(mean) {
            Ok(dist) => dist.sample(&mut self.rng) as u64,
            Err(err) => {
                warn!("poisson draw with mean {mean} rejected: {err}");
                0
            }
        }
    }
}

/// Derives the deterministic seed for a specific substream.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}

/// Substream labels used when splitting one master seed across run modes.
pub mod substreams {
    /// Burst integration and final-state expansion.
    pub const BURST: u64 = 0;
    /// Livetime-based event planning.
    pub const LIVETIME: u64 = 1;
    /// Diffuse background generation.
    pub const DIFFUSE: u64 = 2;
}
