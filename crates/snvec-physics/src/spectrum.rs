//! Steady spectra for diffuse generation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use snvec_core::{io_error, ErrorInfo, SnError, SpectrumModel};

use crate::flux::spectral_shape;
use crate::interpolate::interpolate_log_log_or_zero;

/// Spectrum given as a table, interpolated log-log and zero outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabulatedSpectrum {
    /// Energy nodes in MeV, ascending.
    pub energies: Vec<f64>,
    /// Flux at each node in /cm²/MeV/s.
    pub flux: Vec<f64>,
}

impl TabulatedSpectrum {
    /// Checks the table shape.
    pub fn validate(&self) -> Result<(), SnError> {
        if self.energies.is_empty() || self.energies.len() != self.flux.len() {
            return Err(SnError::Model(
                ErrorInfo::new("spectrum-table", "energies and flux must be non-empty and equal length")
                    .with_context("energies", self.energies.len().to_string())
                    .with_context("flux", self.flux.len().to_string()),
            ));
        }
        if self.energies.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SnError::Model(ErrorInfo::new(
                "spectrum-table",
                "energies must be strictly ascending",
            )));
        }
        if self.flux.iter().any(|&f| f < 0.0) {
            return Err(SnError::Model(ErrorInfo::new(
                "spectrum-table",
                "flux must be non-negative",
            )));
        }
        Ok(())
    }

    /// Reads a two-column text table, `energy flux` per line; `#` starts a comment.
    pub fn load_columns(path: &Path) -> Result<Self, SnError> {
        let text = std::fs::read_to_string(path).map_err(|err| io_error(path, err))?;
        let mut spectrum = Self {
            energies: Vec::new(),
            flux: Vec::new(),
        };
        for (number, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace().map(str::parse::<f64>);
            match (fields.next(), fields.next()) {
                (Some(Ok(energy)), Some(Ok(flux))) => {
                    spectrum.energies.push(energy);
                    spectrum.flux.push(flux);
                }
                _ => {
                    return Err(SnError::Serde(
                        ErrorInfo::new("spectrum-parse", "expected `energy flux` columns")
                            .with_context("path", path.display().to_string())
                            .with_context("line", (number + 1).to_string()),
                    ))
                }
            }
        }
        spectrum.validate()?;
        Ok(spectrum)
    }
}

impl SpectrumModel for TabulatedSpectrum {
    fn flux(&self, energy: f64) -> f64 {
        interpolate_log_log_or_zero(&self.energies, &self.flux, energy)
    }
}

/// Quasi-thermal steady spectrum with a fixed energy-integrated flux.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalSpectrum {
    /// Mean energy in MeV.
    pub mean_energy: f64,
    /// Pinch parameter α.
    pub pinch: f64,
    /// Energy-integrated flux in /cm²/s.
    pub integrated_flux: f64,
}

impl SpectrumModel for ThermalSpectrum {
    fn flux(&self, energy: f64) -> f64 {
        self.integrated_flux * spectral_shape(energy, self.mean_energy, self.pinch)
    }
}
