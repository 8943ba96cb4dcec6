//! Rate integration over the time × energy grid.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use snvec_core::{FluxModel, FluxSample, MixingParameters, RandomSource, ReactionChannel, Vec3};

use crate::accumulator::ChannelAccumulator;
use crate::config::{Normalization, RunConfig};
use crate::grid::EnergyTimeGrid;
use crate::sampler::EventCountSampler;
use crate::store::EventStore;
use crate::xsec_grid::CrossSectionGrid;

/// Expected rate per grid cell, summed over channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateMap {
    time_bins: usize,
    energy_bins: usize,
    values: Vec<f64>,
}

impl RateMap {
    fn zeros(time_bins: usize, energy_bins: usize) -> Self {
        Self {
            time_bins,
            energy_bins,
            values: vec![0.0; time_bins * energy_bins],
        }
    }

    fn add(&mut self, time_bin: usize, energy_bin: usize, rate: f64) {
        self.values[time_bin * self.energy_bins + energy_bin] += rate;
    }

    /// Rate in one cell.
    pub fn get(&self, time_bin: usize, energy_bin: usize) -> f64 {
        self.values[time_bin * self.energy_bins + energy_bin]
    }

    /// Sum over the whole grid.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Rate per time bin, summed over energy.
    pub fn time_profile(&self) -> Vec<f64> {
        self.values
            .chunks(self.energy_bins.max(1))
            .map(|row| row.iter().sum())
            .collect()
    }

    /// Rate per energy bin, summed over time.
    pub fn energy_profile(&self) -> Vec<f64> {
        let mut profile = vec![0.0; self.energy_bins];
        for row in self.values.chunks(self.energy_bins.max(1)) {
            for (slot, value) in profile.iter_mut().zip(row) {
                *slot += value;
            }
        }
        profile
    }

    /// Number of time bins.
    pub fn time_bins(&self) -> usize {
        self.time_bins
    }
}

/// What [`RateIntegrator::integrate`] hands back.
#[derive(Debug, Clone)]
pub struct IntegrationOutcome {
    /// Per-channel totals.
    pub accumulator: ChannelAccumulator,
    /// Raw records, in generation order.
    pub store: EventStore,
    /// Per-cell rates.
    pub rate_map: RateMap,
}

/// Discrete event drawing attached to an integration pass.
pub struct EventDraw<'a, R: ?Sized> {
    /// Count sampler with its vertex volume.
    pub sampler: &'a EventCountSampler,
    /// Neutrino travel direction.
    pub direction: Vec3,
    /// Random stream consumed cell by cell.
    pub rng: &'a mut R,
}

/// Computes expected rates per cell and channel.
#[derive(Debug, Clone, PartialEq)]
pub struct RateIntegrator {
    grid: EnergyTimeGrid,
    mixing: MixingParameters,
    normalization: Normalization,
    distance_scale: f64,
}

impl RateIntegrator {
    /// Integrator with explicit parameters.
    pub fn new(
        grid: EnergyTimeGrid,
        mixing: MixingParameters,
        normalization: Normalization,
        distance_scale: f64,
    ) -> Self {
        Self {
            grid,
            mixing,
            normalization,
            distance_scale,
        }
    }

    /// Integrator for a run configuration.
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(
            config.grid.clone(),
            config.mixing,
            config.normalization,
            config.distance_scale(),
        )
    }

    /// Grid being integrated.
    pub fn grid(&self) -> &EnergyTimeGrid {
        &self.grid
    }

    /// Expected rate in one cell for one channel.
    pub fn cell_rate(&self, channel: &ReactionChannel, flux: &FluxSample, sigma: f64) -> f64 {
        self.normalization.for_family(channel.family())
            * self.mixing.weighted_flux(channel.flavor(), flux)
            * sigma
            * self.grid.energy_width
            * self.grid.time_width
            * self.distance_scale
    }

    /// Expected totals only; no random numbers are consumed.
    pub fn expected_rates<F: FluxModel + ?Sized>(
        &self,
        flux: &F,
        table: &CrossSectionGrid,
    ) -> IntegrationOutcome {
        self.integrate::<F, dyn RandomSource>(flux, table, None)
    }

    /// Visits cells in increasing time then energy, channels in table order.
    ///
    /// With `draw` set, each cell's rate is immediately turned into raw
    /// records, except in cells at or below the channel's event threshold.
    pub fn integrate<F, R>(
        &self,
        flux: &F,
        table: &CrossSectionGrid,
        mut draw: Option<EventDraw<'_, R>>,
    ) -> IntegrationOutcome
    where
        F: FluxModel + ?Sized,
        R: RandomSource + ?Sized,
    {
        let channels = table.channels();
        let mut accumulator = ChannelAccumulator::new(channels);
        let mut store = EventStore::new();
        let mut rate_map = RateMap::zeros(self.grid.time_bins, self.grid.energy_bins);
        let mut non_finite = 0usize;

        for i in 0..self.grid.time_bins {
            let time_bin = self.grid.time_bin(i);
            for j in 0..self.grid.energy_bins {
                let energy_bin = self.grid.energy_bin(j);
                let sample = FluxSample::evaluate(flux, time_bin.center(), energy_bin.center());
                for (k, channel) in channels.iter().enumerate() {
                    let sigma = table.total(k, j);
                    if sigma == 0.0 {
                        continue;
                    }
                    let mut rate = self.cell_rate(channel, &sample, sigma);
                    if !rate.is_finite() {
                        non_finite += 1;
                        rate = 0.0;
                    }
                    accumulator.add_expected(*channel, rate);
                    rate_map.add(i, j, rate);
                    if energy_bin.center() <= table.event_threshold(k) {
                        continue;
                    }
                    if let Some(draw) = draw.as_mut() {
                        let records = draw.sampler.sample(
                            rate,
                            time_bin,
                            energy_bin,
                            *channel,
                            draw.direction,
                            &mut *draw.rng,
                        );
                        accumulator.add_generated(*channel, records.len() as u64);
                        store.extend(records);
                    }
                }
            }
        }

        if non_finite > 0 {
            warn!("{non_finite} grid cells produced a non-finite rate and were zeroed");
        }
        debug!(
            "integrated {} cells over {} channels: expected {:.4}, drawn {}",
            self.grid.time_bins * self.grid.energy_bins,
            channels.len(),
            rate_map.total(),
            store.len()
        );
        IntegrationOutcome {
            accumulator,
            store,
            rate_map,
        }
    }
}
