//! Top-level entry points tying the engine stages together.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use snvec_core::{CrossSectionModel, FluxModel, ReactionChannel, RngHandle, SnError};

use crate::accumulator::{ChannelReport, FamilyTotals};
use crate::config::RunConfig;
use crate::determinism::burst_seed;
use crate::final_state::FinalStateBuilder;
use crate::integrate::{EventDraw, RateIntegrator};
use crate::kinematics::KinematicsSampler;
use crate::sampler::EventCountSampler;
use crate::sink::EventSink;
use crate::xsec_grid::CrossSectionGrid;

/// Summary returned after a burst run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Master seed of the run.
    pub master_seed: u64,
    /// Seed of the burst substream.
    pub burst_seed: u64,
    /// Whether discrete events were drawn.
    pub generate_events: bool,
    /// Expected events summed over every channel.
    pub expected_total: f64,
    /// Raw records drawn.
    pub generated: u64,
    /// Events handed to the sink.
    pub written: u64,
    /// Records dropped during expansion.
    pub skipped: u64,
    /// Per-family totals.
    pub families: Vec<FamilyTotals>,
    /// Per-channel totals in catalogue order.
    pub channels: Vec<ChannelReport>,
}

/// Expected totals without event generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateReport {
    /// Expected events summed over every channel.
    pub expected_total: f64,
    /// Per-family totals.
    pub families: Vec<FamilyTotals>,
    /// Per-channel totals in catalogue order.
    pub channels: Vec<ChannelReport>,
    /// Expected events per time bin.
    pub time_profile: Vec<f64>,
    /// Expected events per energy bin.
    pub energy_profile: Vec<f64>,
}

/// Channels selected by `config`.
pub fn selected_channels(config: &RunConfig) -> Vec<ReactionChannel> {
    ReactionChannel::catalogue(&config.channels)
}

/// Builds the cross-section table for `config`.
pub fn build_table<M: CrossSectionModel + ?Sized>(
    config: &RunConfig,
    xsec: &M,
) -> Result<CrossSectionGrid, SnError> {
    CrossSectionGrid::build(&config.grid, xsec, &selected_channels(config))
}

/// Integrates expected rates only.
pub fn run_rates<F, M>(config: &RunConfig, flux: &F, xsec: &M) -> Result<RateReport, SnError>
where
    F: FluxModel + ?Sized,
    M: CrossSectionModel + ?Sized,
{
    config.validate()?;
    let table = build_table(config, xsec)?;
    let outcome = RateIntegrator::from_config(config).expected_rates(flux, &table);
    Ok(RateReport {
        expected_total: outcome.accumulator.grand_total().expected,
        families: outcome.accumulator.family_totals(),
        channels: outcome.accumulator.reports()?,
        time_profile: outcome.rate_map.time_profile(),
        energy_profile: outcome.rate_map.energy_profile(),
    })
}

/// Burst run building its own cross-section table.
pub fn run_burst<F, M, S>(
    config: &RunConfig,
    flux: &F,
    xsec: &M,
    sink: &mut S,
) -> Result<RunSummary, SnError>
where
    F: FluxModel + ?Sized,
    M: CrossSectionModel,
    S: EventSink + ?Sized,
{
    config.validate()?;
    let table = build_table(config, xsec)?;
    run_burst_with_table(config, flux, xsec, &table, sink)
}

/// Burst run against a prepared cross-section table.
///
/// Records whose kinematics cannot be sampled are counted as skipped; an
/// exhausted envelope aborts the run.
pub fn run_burst_with_table<F, M, S>(
    config: &RunConfig,
    flux: &F,
    xsec: &M,
    table: &CrossSectionGrid,
    sink: &mut S,
) -> Result<RunSummary, SnError>
where
    F: FluxModel + ?Sized,
    M: CrossSectionModel,
    S: EventSink + ?Sized,
{
    config.validate()?;
    let master_seed = config.seed_policy.master_seed;
    let seed = burst_seed(master_seed);
    let mut rng = RngHandle::from_seed(seed);
    info!(
        "burst run: {} channels, {}x{} cells, distance {} kpc, seed {master_seed}",
        table.channels().len(),
        config.grid.time_bins,
        config.grid.energy_bins,
        config.distance_kpc
    );

    let integrator = RateIntegrator::from_config(config);
    let sampler = EventCountSampler::new(config.volume.resolve());
    let draw = if config.generate_events {
        Some(EventDraw {
            sampler: &sampler,
            direction: config.unit_direction(),
            rng: &mut rng,
        })
    } else {
        None
    };
    let outcome = integrator.integrate(flux, table, draw);
    let mut accumulator = outcome.accumulator;

    let builder = FinalStateBuilder::new(KinematicsSampler::new(&config.kinematics));
    let mut written = 0u64;
    for record in outcome.store.into_time_ordered() {
        match builder.build(&record, xsec, &mut rng) {
            Ok(event) => {
                sink.accept(event)?;
                written += 1;
            }
            Err(err) if err.is_recoverable() => {
                warn!(
                    "skipping {} at E={:.3} MeV: {err}",
                    record.channel.label(),
                    record.energy
                );
                accumulator.add_skipped(record.channel);
            }
            Err(err) => return Err(err),
        }
    }
    sink.finish()?;

    let totals = accumulator.grand_total();
    info!(
        "burst run done: expected {:.3}, drawn {}, written {written}, skipped {}",
        totals.expected, totals.generated, totals.skipped
    );
    Ok(RunSummary {
        master_seed,
        burst_seed: seed,
        generate_events: config.generate_events,
        expected_total: totals.expected,
        generated: totals.generated,
        written,
        skipped: totals.skipped,
        families: accumulator.family_totals(),
        channels: accumulator.reports()?,
    })
}
