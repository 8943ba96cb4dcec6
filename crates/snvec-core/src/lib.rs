#![deny(missing_docs)]
#![doc = "Core traits and data types for the supernova neutrino vector generator."]

pub mod channel;
pub mod constants;
pub mod errors;
pub mod event;
pub mod models;
pub mod rng;

pub use channel::{
    CcExcitation, ChannelFamily, ChannelSelection, DecayChannel, Flavor, Nucleon, ReactionChannel,
};
pub use errors::{io_error, ErrorInfo, SnError};
pub use event::{FinalStateEvent, FinalStateParticle, RawEventRecord, Vec3, VertexRecord};
pub use models::{
    CrossSectionModel, DifferentialSample, FluxModel, FluxSample, MixingPair, MixingParameters,
    RunPeriodLookup, SpectrumModel, SubrunKey,
};
pub use rng::{derive_substream_seed, RandomSource, RngHandle};
