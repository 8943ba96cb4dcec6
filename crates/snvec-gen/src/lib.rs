#![deny(missing_docs)]
#![doc = include_str!("../docs/engine-api.md")]

/// Per-channel running totals and CSV export.
pub mod accumulator;
/// YAML configuration schema and defaults.
pub mod config;
/// Deterministic substream seeds.
pub mod determinism;
/// Diffuse-mode IBD generation.
pub mod diffuse;
/// Final-state templates per channel family.
pub mod final_state;
/// Local-to-lab frame rotation and isotropic directions.
pub mod frame;
/// Time × energy grid.
pub mod grid;
/// Rate integration.
pub mod integrate;
/// Lepton kinematics by rejection sampling.
pub mod kinematics;
/// Livetime table and subrun event planning.
pub mod livetime;
/// Run manifest serialization helpers.
pub mod manifest;
/// Burst and rate entry points.
pub mod run;
/// Poisson counts and vertex placement.
pub mod sampler;
/// Event sink seam.
pub mod sink;
/// Time-ordered raw record buffer.
pub mod store;
/// Cached cross-section tables.
pub mod xsec_grid;

pub use accumulator::{
    write_reports_csv, ChannelAccumulator, ChannelReport, ChannelTotals, FamilyTotals,
};
pub use config::{
    DiffuseConfig, FluxSource, KinematicsConfig, LoadedSpectrum, Normalization, OutputConfig,
    PhysicsConfig, RunConfig, SeedPolicy, SpectrumSource, VolumeConfig,
};
pub use diffuse::{DiffuseGenerator, DiffuseOutcome, IntegralEstimate};
pub use final_state::{FinalStateBuilder, ParticleRole};
pub use frame::{isotropic_direction, FrameRotation};
pub use grid::{Bin, EnergyTimeGrid};
pub use integrate::{EventDraw, IntegrationOutcome, RateIntegrator, RateMap};
pub use kinematics::{KinematicsSampler, LeptonKinematics};
pub use livetime::{plan_subrun_events, stochastic_round, LivetimeTable, SubrunPlan};
pub use manifest::RunManifest;
pub use run::{run_burst, run_burst_with_table, run_rates, RateReport, RunSummary};
pub use sampler::{Cylinder, DetectorVolume, EventCountSampler, TankGeometry};
pub use sink::{EventSink, VecSink};
pub use store::EventStore;
pub use xsec_grid::CrossSectionGrid;
