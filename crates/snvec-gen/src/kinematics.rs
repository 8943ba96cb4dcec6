//! Rejection sampling of the outgoing lepton angle and energy.

use std::f64::consts::PI;

use log::warn;
use snvec_core::constants::FORWARD_EPSILON;
use snvec_core::{CrossSectionModel, ErrorInfo, RandomSource, ReactionChannel, SnError};
use snvec_physics::elastic;

use crate::config::KinematicsConfig;

/// One accepted lepton sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeptonKinematics {
    /// Total energy of the outgoing lepton in MeV.
    pub energy: f64,
    /// Accepted cosθ relative to the neutrino direction.
    pub cos_theta: f64,
    /// Polar angle in radians.
    pub theta: f64,
    /// Azimuth in `[-π, π)`.
    pub phi: f64,
    /// Proposals drawn before acceptance, including the accepted one.
    pub attempts: u32,
}

/// Per-event envelope search plus bounded rejection loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicsSampler {
    cos_bins: usize,
    max_iterations: u32,
    elastic_min_total_energy: f64,
}

impl KinematicsSampler {
    /// Sampler tuned by the run configuration.
    pub fn new(config: &KinematicsConfig) -> Self {
        Self {
            cos_bins: config.cos_bins.max(1),
            max_iterations: config.max_iterations.max(1),
            elastic_min_total_energy: config.elastic_min_total_energy,
        }
    }

    /// Iteration cap.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Sampled cosθ interval for `channel` at neutrino energy `energy`.
    ///
    /// Elastic scattering samples `[cosθ_th, 1]`. A threshold above one is
    /// unphysical; a threshold of exactly one leaves an empty interval. Both
    /// are reported as kinematics errors.
    pub fn cos_range(&self, channel: &ReactionChannel, energy: f64) -> Result<(f64, f64), SnError> {
        match channel {
            ReactionChannel::ElasticScattering { .. } => {
                let lower = elastic::cos_threshold(energy, self.elastic_min_total_energy);
                if !lower.is_finite() || lower.abs() > 1.0 {
                    return Err(SnError::Kinematics(
                        region_info(channel, energy, "threshold angle is unphysical")
                            .with_context("cos_threshold", lower.to_string()),
                    ));
                }
                if lower >= 1.0 {
                    return Err(SnError::Kinematics(
                        region_info(channel, energy, "sampled angle interval is empty")
                            .with_context("cos_threshold", lower.to_string()),
                    ));
                }
                Ok((lower, 1.0))
            }
            _ => Ok((-1.0, 1.0)),
        }
    }

    /// Largest differential probability found on the scan grid.
    ///
    /// Scans `cos_bins` midpoints of `[lo, hi]` plus the near-forward point
    /// and the lower edge.
    pub fn envelope<M: CrossSectionModel + ?Sized>(
        &self,
        model: &M,
        channel: &ReactionChannel,
        energy: f64,
        lo: f64,
        hi: f64,
    ) -> f64 {
        let step = (hi - lo) / self.cos_bins as f64;
        let density = |cos: f64| {
            let p = model.differential(channel, energy, cos).probability;
            if p.is_finite() {
                p
            } else {
                0.0
            }
        };
        let mut ceiling = density(1.0 - FORWARD_EPSILON).max(density(lo));
        for k in 0..self.cos_bins {
            ceiling = ceiling.max(density(lo + (k as f64 + 0.5) * step));
        }
        ceiling
    }

    /// Draws the lepton kinematics for one interaction.
    pub fn sample<M, R>(
        &self,
        model: &M,
        channel: &ReactionChannel,
        energy: f64,
        rng: &mut R,
    ) -> Result<LeptonKinematics, SnError>
    where
        M: CrossSectionModel + ?Sized,
        R: RandomSource + ?Sized,
    {
        if energy <= model.event_threshold(channel) {
            return Err(no_region(channel, energy, "neutrino energy is below threshold"));
        }
        let (lo, hi) = self.cos_range(channel, energy)?;
        let ceiling = self.envelope(model, channel, energy, lo, hi);
        if !(ceiling > 0.0) {
            return Err(no_region(channel, energy, "differential cross section vanishes"));
        }

        let mut warned = false;
        for attempt in 1..=self.max_iterations {
            let cos_theta = rng.uniform(lo, hi);
            let sample = model.differential(channel, energy, cos_theta);
            if sample.probability > ceiling && !warned {
                warn!(
                    "{}: probability {:.4e} above envelope {:.4e} at E={:.3} cos={:.4}",
                    channel.label(),
                    sample.probability,
                    ceiling,
                    energy,
                    cos_theta
                );
                warned = true;
            }
            let x = rng.uniform(0.0, ceiling);
            if x < sample.probability {
                let phi = rng.uniform(-PI, PI);
                return Ok(LeptonKinematics {
                    energy: sample.secondary_energy,
                    cos_theta,
                    theta: cos_theta.clamp(-1.0, 1.0).acos(),
                    phi,
                    attempts: attempt,
                });
            }
        }
        Err(SnError::Envelope(
            ErrorInfo::new("envelope-too-low", "rejection sampling hit its iteration cap")
                .with_context("channel", channel.label())
                .with_context("energy", energy.to_string())
                .with_context("envelope", ceiling.to_string())
                .with_context("max_iterations", self.max_iterations.to_string())
                .with_hint("increase kinematics.cos_bins so the envelope scan finds the peak"),
        ))
    }
}

fn region_info(channel: &ReactionChannel, energy: f64, message: &str) -> ErrorInfo {
    ErrorInfo::new("no-kinematic-region", message)
        .with_context("channel", channel.label())
        .with_context("energy", energy.to_string())
}

fn no_region(channel: &ReactionChannel, energy: f64, message: &str) -> SnError {
    SnError::Kinematics(region_info(channel, energy, message))
}
