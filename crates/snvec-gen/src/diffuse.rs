//! Time-independent inverse beta decay generation from a steady spectrum.

use std::f64::consts::PI;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use snvec_core::constants::ELECTRON_MASS;
use snvec_core::{
    ErrorInfo, FinalStateEvent, RandomSource, ReactionChannel, SnError, SpectrumModel, SubrunKey,
    VertexRecord,
};
use snvec_physics::ibd;

use crate::config::DiffuseConfig;
use crate::final_state::assemble_inverse_beta_decay;
use crate::frame::isotropic_direction;
use crate::kinematics::LeptonKinematics;
use crate::sampler::Cylinder;
use crate::sink::{EventSink, VecSink};

/// Hit-or-miss estimate of ∫∫ φ(E)·dσ/dcosθ over the sampled box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegralEstimate {
    /// Estimated integral.
    pub value: f64,
    /// Binomial standard error.
    pub error: f64,
    /// Accepted proposals.
    pub hits: u64,
    /// All proposals.
    pub throws: u64,
}

/// Events plus the integral estimate collected while drawing them.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffuseOutcome {
    /// Generated events in draw order.
    pub events: Vec<FinalStateEvent>,
    /// Integral estimate from the rejection loop.
    pub estimate: IntegralEstimate,
}

#[derive(Debug, Default)]
struct Tally {
    hits: u64,
    throws: u64,
}

/// Draws IBD events whose energy follows `spectrum × σ`.
#[derive(Debug)]
pub struct DiffuseGenerator<'a, S: ?Sized> {
    spectrum: &'a S,
    config: DiffuseConfig,
    volume: Cylinder,
    ceiling: f64,
}

impl<'a, S: SpectrumModel + ?Sized> DiffuseGenerator<'a, S> {
    /// Validates the ranges and scans for the sampling ceiling.
    pub fn new(spectrum: &'a S, config: &DiffuseConfig, volume: Cylinder) -> Result<Self, SnError> {
        config.validate()?;
        volume.validate()?;
        let mut generator = Self {
            spectrum,
            config: config.clone(),
            volume,
            ceiling: 0.0,
        };
        generator.ceiling = generator.scan_ceiling();
        if !config.flat && !(generator.ceiling > 0.0) {
            return Err(SnError::Kinematics(
                ErrorInfo::new("no-kinematic-region", "flux times cross section vanishes over the sampled box")
                    .with_context("energy_min", config.energy_min.to_string())
                    .with_context("energy_max", config.energy_max.to_string()),
            ));
        }
        debug!("diffuse sampling ceiling {:.4e}", generator.ceiling);
        Ok(generator)
    }

    /// Maximum of `φ(E)·dσ/dcosθ` found by the scan.
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    fn density(&self, energy: f64, cos_theta: f64) -> (f64, f64) {
        let sample = ibd::differential(energy, cos_theta);
        let p = self.spectrum.flux(energy) * sample.probability;
        (if p.is_finite() { p } else { 0.0 }, sample.secondary_energy)
    }

    fn scan_ceiling(&self) -> f64 {
        let n = self.config.scan_bins;
        let de = (self.config.energy_max - self.config.energy_min) / n as f64;
        let dc = (self.config.cos_max - self.config.cos_min) / n as f64;
        let mut ceiling = 0.0f64;
        for a in 0..=n {
            let energy = self.config.energy_min + a as f64 * de;
            for b in 0..=n {
                let cos_theta = self.config.cos_min + b as f64 * dc;
                ceiling = ceiling.max(self.density(energy, cos_theta).0);
            }
        }
        ceiling
    }

    fn draw_kinematics<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
        tally: &mut Tally,
    ) -> Result<(f64, LeptonKinematics), SnError> {
        let cfg = &self.config;
        for attempt in 1..=cfg.max_iterations {
            let (energy, cos_theta, positron_energy) = if cfg.flat {
                let positron_energy = rng.uniform(cfg.energy_min, cfg.energy_max);
                let cos_theta = rng.uniform(cfg.cos_min, cfg.cos_max);
                match ibd::neutrino_energy_for_positron(positron_energy, cos_theta) {
                    Some(energy) => (energy, cos_theta, positron_energy),
                    None => continue,
                }
            } else {
                let energy = rng.uniform(cfg.energy_min, cfg.energy_max);
                let cos_theta = rng.uniform(cfg.cos_min, cfg.cos_max);
                let (p, positron_energy) = self.density(energy, cos_theta);
                if p > self.ceiling {
                    warn!(
                        "diffuse density {:.4e} above ceiling {:.4e} at E={:.3}",
                        p, self.ceiling, energy
                    );
                }
                let x = rng.uniform(0.0, self.ceiling);
                tally.throws += 1;
                if x >= p {
                    continue;
                }
                tally.hits += 1;
                (energy, cos_theta, positron_energy)
            };
            if positron_energy <= ELECTRON_MASS {
                continue;
            }
            let phi = rng.uniform(-PI, PI);
            return Ok((
                energy,
                LeptonKinematics {
                    energy: positron_energy,
                    cos_theta,
                    theta: cos_theta.clamp(-1.0, 1.0).acos(),
                    phi,
                    attempts: attempt,
                },
            ));
        }
        Err(SnError::Envelope(
            ErrorInfo::new("envelope-too-low", "diffuse sampling hit its iteration cap")
                .with_context("ceiling", self.ceiling.to_string())
                .with_context("max_iterations", cfg.max_iterations.to_string())
                .with_hint("increase physics.diffuse.scan_bins or narrow the energy range"),
        ))
    }

    fn draw_event<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
        tally: &mut Tally,
        subrun: Option<SubrunKey>,
    ) -> Result<FinalStateEvent, SnError> {
        let (energy, positron) = self.draw_kinematics(rng, tally)?;
        let direction = isotropic_direction(rng);
        let position = self.volume.sample_vertex(rng);
        Ok(FinalStateEvent {
            channel_id: ReactionChannel::InverseBetaDecay.encode()?,
            emission_time: 0.0,
            neutrino_energy: energy,
            particles: assemble_inverse_beta_decay(energy, direction, &positron),
            vertex: VertexRecord {
                position,
                time: 0.0,
                kind: 1,
                parent: 0,
            },
            subrun,
        })
    }

    /// Draws `count` events, optionally tagged with a subrun.
    ///
    /// Every event is kept in memory; use [`DiffuseGenerator::generate_into`]
    /// for large counts.
    pub fn generate<R: RandomSource + ?Sized>(
        &self,
        count: u64,
        subrun: Option<SubrunKey>,
        rng: &mut R,
    ) -> Result<DiffuseOutcome, SnError> {
        let mut sink = VecSink::new();
        let estimate = self.generate_into(count, subrun, rng, &mut sink)?;
        Ok(DiffuseOutcome {
            events: sink.events,
            estimate,
        })
    }

    /// Streams `count` events into `sink` as they are drawn, then finishes it.
    pub fn generate_into<R, K>(
        &self,
        count: u64,
        subrun: Option<SubrunKey>,
        rng: &mut R,
        sink: &mut K,
    ) -> Result<IntegralEstimate, SnError>
    where
        R: RandomSource + ?Sized,
        K: EventSink + ?Sized,
    {
        let mut tally = Tally::default();
        for _ in 0..count {
            sink.accept(self.draw_event(rng, &mut tally, subrun)?)?;
        }
        sink.finish()?;
        Ok(self.estimate(&tally))
    }

    fn estimate(&self, tally: &Tally) -> IntegralEstimate {
        if tally.throws == 0 {
            return IntegralEstimate::default();
        }
        let cfg = &self.config;
        let area =
            self.ceiling * (cfg.energy_max - cfg.energy_min) * (cfg.cos_max - cfg.cos_min);
        let n = tally.throws as f64;
        let p = tally.hits as f64 / n;
        IntegralEstimate {
            value: p * area,
            error: area * (p * (1.0 - p) / n).sqrt(),
            hits: tally.hits,
            throws: tally.throws,
        }
    }
}
