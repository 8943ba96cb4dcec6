//! Collaborator interfaces consumed by the engine.

use serde::{Deserialize, Serialize};

use crate::channel::{Flavor, ReactionChannel};

/// Time- and energy-dependent neutrino flux at the reference distance.
pub trait FluxModel {
    /// Number flux in /cm²/MeV/s at `time` (s) and `energy` (MeV).
    fn flux(&self, time: f64, energy: f64, flavor: Flavor) -> f64;
}

impl<F> FluxModel for F
where
    F: Fn(f64, f64, Flavor) -> f64,
{
    fn flux(&self, time: f64, energy: f64, flavor: Flavor) -> f64 {
        self(time, energy, flavor)
    }
}

/// Time-integrated spectrum of a steady source, used by diffuse generation.
pub trait SpectrumModel {
    /// Number flux in /cm²/MeV/s at `energy` (MeV).
    fn flux(&self, energy: f64) -> f64;
}

/// Differential probability together with the outgoing secondary energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialSample {
    /// Unnormalized probability density in cosθ.
    pub probability: f64,
    /// Total energy of the outgoing lepton in MeV.
    pub secondary_energy: f64,
}

/// Per-channel cross sections.
pub trait CrossSectionModel {
    /// Total cross section in cm² at neutrino energy `energy`.
    fn total(&self, channel: &ReactionChannel, energy: f64) -> f64;

    /// Differential cross section in cosθ of the outgoing lepton.
    fn differential(
        &self,
        channel: &ReactionChannel,
        energy: f64,
        cos_theta: f64,
    ) -> DifferentialSample;

    /// Neutrino energy at or below which the channel is closed.
    fn threshold(&self, _channel: &ReactionChannel) -> f64 {
        0.0
    }

    /// Neutrino energy at or below which no events are drawn, even where a
    /// rate is still counted.
    fn event_threshold(&self, channel: &ReactionChannel) -> f64 {
        self.threshold(channel)
    }
}

/// Identifier of one subrun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubrunKey {
    /// Run number.
    pub run: u32,
    /// Subrun number within the run.
    pub subrun: u32,
}

/// Detector run bookkeeping.
pub trait RunPeriodLookup {
    /// Live time of the subrun in seconds, if it is known.
    fn livetime_seconds(&self, run: u32, subrun: u32) -> Option<f64>;

    /// Known subruns with `run_begin <= run < run_end`, in ascending order.
    fn subruns(&self, run_begin: u32, run_end: u32) -> Vec<SubrunKey>;
}

/// Flux of the three source classes at one grid point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FluxSample {
    /// Electron neutrino flux.
    pub nue: f64,
    /// Electron antineutrino flux.
    pub nuebar: f64,
    /// Heavy-flavor flux, shared by neutrinos and antineutrinos.
    pub nux: f64,
}

impl FluxSample {
    /// Evaluates a flux model for every source class.
    pub fn evaluate<M: FluxModel + ?Sized>(model: &M, time: f64, energy: f64) -> Self {
        Self {
            nue: model.flux(time, energy, Flavor::ElectronNeutrino),
            nuebar: model.flux(time, energy, Flavor::ElectronAntineutrino),
            nux: model.flux(time, energy, Flavor::HeavyNeutrino),
        }
    }
}

/// Survival and conversion coefficients for one detected flavor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixingPair {
    /// Weight of the flavor's own source flux.
    #[serde(default = "unit")]
    pub own: f64,
    /// Weight of the partner source flux.
    #[serde(default)]
    pub partner: f64,
}

fn unit() -> f64 {
    1.0
}

impl Default for MixingPair {
    fn default() -> Self {
        Self {
            own: 1.0,
            partner: 0.0,
        }
    }
}

/// Flavor-mixing coefficients applied at the detector.
///
/// Partners: νe↔νx, ν̄e↔νx, νx↔νe, ν̄x↔ν̄e.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MixingParameters {
    /// Detected electron neutrinos.
    #[serde(default)]
    pub nue: MixingPair,
    /// Detected electron antineutrinos.
    #[serde(default)]
    pub nuebar: MixingPair,
    /// Detected heavy neutrinos.
    #[serde(default)]
    pub nux: MixingPair,
    /// Detected heavy antineutrinos.
    #[serde(default)]
    pub nuxbar: MixingPair,
}

impl MixingParameters {
    /// Mixing-weighted flux seen by a channel of the given incident flavor.
    pub fn weighted_flux(&self, flavor: Flavor, sample: &FluxSample) -> f64 {
        match flavor {
            Flavor::ElectronNeutrino => self.nue.own * sample.nue + self.nue.partner * sample.nux,
            Flavor::ElectronAntineutrino => {
                self.nuebar.own * sample.nuebar + self.nuebar.partner * sample.nux
            }
            Flavor::HeavyNeutrino => self.nux.own * sample.nux + self.nux.partner * sample.nue,
            Flavor::HeavyAntineutrino => {
                self.nuxbar.own * sample.nux + self.nuxbar.partner * sample.nuebar
            }
        }
    }
}
