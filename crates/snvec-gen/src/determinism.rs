use serde::{Deserialize, Serialize};
use snvec_core::rng::substreams;
use snvec_core::{derive_substream_seed, SubrunKey};

/// Seed of the burst integration and expansion stream.
pub fn burst_seed(master_seed: u64) -> u64 {
    derive_substream_seed(master_seed, substreams::BURST)
}

/// Seed of the livetime planning stream.
pub fn livetime_seed(master_seed: u64) -> u64 {
    derive_substream_seed(master_seed, substreams::LIVETIME)
}

/// Seed of the diffuse generation stream.
pub fn diffuse_seed(master_seed: u64) -> u64 {
    derive_substream_seed(master_seed, substreams::DIFFUSE)
}

/// Seed of the diffuse events drawn for one subrun.
pub fn subrun_seed(master_seed: u64, key: SubrunKey) -> u64 {
    derive_substream_seed(
        diffuse_seed(master_seed),
        (key.run as u64) << 32 | key.subrun as u64,
    )
}

/// Every substream seed derived from one master seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedSeeds {
    /// Burst stream.
    pub burst: u64,
    /// Livetime planning stream.
    pub livetime: u64,
    /// Diffuse stream.
    pub diffuse: u64,
}

impl DerivedSeeds {
    /// Derives all substream seeds.
    pub fn for_master(master_seed: u64) -> Self {
        Self {
            burst: burst_seed(master_seed),
            livetime: livetime_seed(master_seed),
            diffuse: diffuse_seed(master_seed),
        }
    }
}
