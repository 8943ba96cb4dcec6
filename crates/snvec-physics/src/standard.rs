//! Dispatch from reaction channel to the concrete cross-section providers.

use snvec_core::{ChannelFamily, CrossSectionModel, DifferentialSample, ReactionChannel};

use crate::oxygen::OxygenCrossSections;
use crate::{elastic, ibd};

/// The standard water-target cross sections.
///
/// Without oxygen tables every oxygen channel has zero cross section.
#[derive(Debug, Clone)]
pub struct StandardCrossSections {
    oxygen: Option<OxygenCrossSections>,
    elastic_min_total_energy: f64,
}

impl Default for StandardCrossSections {
    fn default() -> Self {
        Self::new(None)
    }
}

impl StandardCrossSections {
    /// Creates the provider set, optionally with oxygen tables.
    pub fn new(oxygen: Option<OxygenCrossSections>) -> Self {
        Self {
            oxygen,
            elastic_min_total_energy: elastic::DEFAULT_MIN_TOTAL_ENERGY,
        }
    }

    /// Counts only elastic recoils with at least this total energy, in MeV.
    pub fn with_elastic_min_total_energy(mut self, min_total_energy: f64) -> Self {
        self.elastic_min_total_energy = min_total_energy;
        self
    }

    /// Recoil cut applied to the elastic totals.
    pub fn elastic_min_total_energy(&self) -> f64 {
        self.elastic_min_total_energy
    }

    /// Whether oxygen tables are loaded.
    pub fn has_oxygen(&self) -> bool {
        self.oxygen.is_some()
    }
}

impl CrossSectionModel for StandardCrossSections {
    fn total(&self, channel: &ReactionChannel, energy: f64) -> f64 {
        match channel {
            ReactionChannel::InverseBetaDecay => ibd::total_cross_section(energy),
            ReactionChannel::ElasticScattering { flavor } => {
                elastic::total_cross_section(*flavor, energy, self.elastic_min_total_energy)
            }
            _ => self
                .oxygen
                .as_ref()
                .map_or(0.0, |oxygen| oxygen.total(channel, energy)),
        }
    }

    fn differential(
        &self,
        channel: &ReactionChannel,
        energy: f64,
        cos_theta: f64,
    ) -> DifferentialSample {
        match channel {
            ReactionChannel::InverseBetaDecay => ibd::differential(energy, cos_theta),
            ReactionChannel::ElasticScattering { flavor } => {
                elastic::differential(*flavor, energy, cos_theta)
            }
            _ => match &self.oxygen {
                Some(oxygen) => oxygen.differential(channel, energy, cos_theta),
                None => DifferentialSample {
                    probability: 0.0,
                    secondary_energy: energy,
                },
            },
        }
    }

    fn threshold(&self, channel: &ReactionChannel) -> f64 {
        match channel {
            ReactionChannel::InverseBetaDecay => ibd::THRESHOLD,
            ReactionChannel::ElasticScattering { .. } => {
                elastic::threshold_energy(self.elastic_min_total_energy)
            }
            _ => self
                .oxygen
                .as_ref()
                .map_or(0.0, |oxygen| oxygen.threshold(channel)),
        }
    }

    fn event_threshold(&self, channel: &ReactionChannel) -> f64 {
        match (&self.oxygen, channel.family()) {
            (Some(oxygen), ChannelFamily::ChargedCurrentOxygen) => oxygen.event_threshold(channel),
            _ => self.threshold(channel),
        }
    }
}
