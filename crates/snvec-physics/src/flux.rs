//! Quasi-thermal (pinched Fermi-Dirac-like) supernova flux.

use std::path::Path;

use serde::{Deserialize, Serialize};
use snvec_core::constants::{ERG_TO_MEV, REFERENCE_DISTANCE_CM};
use snvec_core::{io_error, ErrorInfo, Flavor, FluxModel, SnError};

use crate::interpolate::{interpolate_linear, ln_gamma};

/// Time evolution of one flavor class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluxTable {
    /// Time nodes in seconds, ascending.
    pub time: Vec<f64>,
    /// Luminosity in erg/s.
    pub luminosity: Vec<f64>,
    /// Mean energy in MeV.
    pub mean_energy: Vec<f64>,
    /// Pinch parameter α.
    pub pinch: Vec<f64>,
}

impl FluxTable {
    /// Constant emission over `[t_start, t_end]`.
    pub fn constant(t_start: f64, t_end: f64, luminosity: f64, mean_energy: f64, pinch: f64) -> Self {
        Self {
            time: vec![t_start, t_end],
            luminosity: vec![luminosity; 2],
            mean_energy: vec![mean_energy; 2],
            pinch: vec![pinch; 2],
        }
    }

    fn validate(&self, name: &str) -> Result<(), SnError> {
        let len = self.time.len();
        let fail = |message: &str| {
            SnError::Model(ErrorInfo::new("flux-table", message).with_context("flavor", name))
        };
        if len == 0 {
            return Err(fail("flux table is empty"));
        }
        if self.luminosity.len() != len || self.mean_energy.len() != len || self.pinch.len() != len
        {
            return Err(fail("flux table columns differ in length"));
        }
        if self.time.windows(2).any(|w| w[1] < w[0]) {
            return Err(fail("flux table times are not ascending"));
        }
        if self.mean_energy.iter().any(|&e| !(e > 0.0)) {
            return Err(fail("mean energy must be positive"));
        }
        if self.pinch.iter().any(|&a| !(a > -1.0)) {
            return Err(fail("pinch parameter must exceed -1"));
        }
        Ok(())
    }

    /// Number flux at the reference distance, /cm²/MeV/s.
    pub fn evaluate(&self, time: f64, energy: f64) -> f64 {
        let (first, last) = match (self.time.first(), self.time.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return 0.0,
        };
        if time < first || time > last || energy <= 0.0 {
            return 0.0;
        }
        let luminosity = interpolate_linear(&self.time, &self.luminosity, time);
        let mean = interpolate_linear(&self.time, &self.mean_energy, time);
        let alpha = interpolate_linear(&self.time, &self.pinch, time);
        if luminosity <= 0.0 || mean <= 0.0 {
            return 0.0;
        }
        let number_rate = luminosity * ERG_TO_MEV / mean;
        let area = 4.0 * std::f64::consts::PI * REFERENCE_DISTANCE_CM * REFERENCE_DISTANCE_CM;
        number_rate / area * spectral_shape(energy, mean, alpha)
    }
}

/// Normalized quasi-thermal spectrum with mean `mean` and pinch `alpha`.
pub fn spectral_shape(energy: f64, mean: f64, alpha: f64) -> f64 {
    if energy <= 0.0 {
        return 0.0;
    }
    let a1 = alpha + 1.0;
    let ln_value = a1 * a1.ln() - ln_gamma(a1) + alpha * energy.ln() - a1 * mean.ln()
        - a1 * energy / mean;
    ln_value.exp()
}

/// Flux model built from per-class time tables.
///
/// Heavy-flavor antineutrinos share the heavy-flavor table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuasiThermalFlux {
    /// Electron neutrinos.
    pub nue: FluxTable,
    /// Electron antineutrinos.
    pub nuebar: FluxTable,
    /// Heavy-flavor neutrinos and antineutrinos.
    pub nux: FluxTable,
}

impl QuasiThermalFlux {
    /// Checks every table for consistency.
    pub fn validate(&self) -> Result<(), SnError> {
        self.nue.validate("nue")?;
        self.nuebar.validate("nuebar")?;
        self.nux.validate("nux")
    }

    /// Loads and validates a YAML flux description.
    pub fn load(path: &Path) -> Result<Self, SnError> {
        let text = std::fs::read_to_string(path).map_err(|err| io_error(path, err))?;
        let flux: QuasiThermalFlux = serde_yaml::from_str(&text).map_err(|err| {
            SnError::Serde(
                ErrorInfo::new("flux-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        flux.validate()?;
        Ok(flux)
    }

    /// A textbook burst: 10 s of 5e52 erg/s per class, with the usual mean energies.
    pub fn reference_burst() -> Self {
        Self {
            nue: FluxTable::constant(0.0, 10.0, 5.0e52, 12.0, 3.0),
            nuebar: FluxTable::constant(0.0, 10.0, 5.0e52, 15.0, 3.0),
            nux: FluxTable::constant(0.0, 10.0, 5.0e52, 18.0, 3.0),
        }
    }
}

impl FluxModel for QuasiThermalFlux {
    fn flux(&self, time: f64, energy: f64, flavor: Flavor) -> f64 {
        let table = match flavor {
            Flavor::ElectronNeutrino => &self.nue,
            Flavor::ElectronAntineutrino => &self.nuebar,
            Flavor::HeavyNeutrino | Flavor::HeavyAntineutrino => &self.nux,
        };
        table.evaluate(time, energy)
    }
}
