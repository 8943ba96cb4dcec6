use serde::{Deserialize, Serialize};
use snvec_core::{ErrorInfo, SnError};

/// Half-open interval `[lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    /// Lower edge.
    pub lo: f64,
    /// Upper edge.
    pub hi: f64,
}

impl Bin {
    /// Midpoint of the bin.
    pub fn center(&self) -> f64 {
        0.5 * (self.lo + self.hi)
    }

    /// Bin width.
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }
}

/// Fixed-width time × energy grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyTimeGrid {
    /// Start of the first time bin in seconds.
    #[serde(default)]
    pub time_start: f64,
    /// Width of each time bin in seconds.
    #[serde(default = "default_time_width")]
    pub time_width: f64,
    /// Number of time bins.
    #[serde(default = "default_time_bins")]
    pub time_bins: usize,
    /// Lower edge of the first energy bin in MeV.
    #[serde(default)]
    pub energy_min: f64,
    /// Width of each energy bin in MeV.
    #[serde(default = "default_energy_width")]
    pub energy_width: f64,
    /// Number of energy bins.
    #[serde(default = "default_energy_bins")]
    pub energy_bins: usize,
}

fn default_time_width() -> f64 {
    0.01
}

fn default_time_bins() -> usize {
    1000
}

fn default_energy_width() -> f64 {
    1.0
}

fn default_energy_bins() -> usize {
    150
}

impl Default for EnergyTimeGrid {
    fn default() -> Self {
        Self {
            time_start: 0.0,
            time_width: default_time_width(),
            time_bins: default_time_bins(),
            energy_min: 0.0,
            energy_width: default_energy_width(),
            energy_bins: default_energy_bins(),
        }
    }
}

impl EnergyTimeGrid {
    /// Checks that both axes are non-empty with positive widths.
    pub fn validate(&self) -> Result<(), SnError> {
        let fail = |field: &str, value: String| {
            SnError::Config(
                ErrorInfo::new("grid", "grid axes need positive widths and at least one bin")
                    .with_context("field", field)
                    .with_context("value", value),
            )
        };
        if self.time_bins == 0 {
            return Err(fail("time_bins", "0".into()));
        }
        if self.energy_bins == 0 {
            return Err(fail("energy_bins", "0".into()));
        }
        if !(self.time_width > 0.0) || !self.time_width.is_finite() {
            return Err(fail("time_width", self.time_width.to_string()));
        }
        if !(self.energy_width > 0.0) || !self.energy_width.is_finite() {
            return Err(fail("energy_width", self.energy_width.to_string()));
        }
        if self.energy_min < 0.0 {
            return Err(fail("energy_min", self.energy_min.to_string()));
        }
        Ok(())
    }

    /// Time bin `index`.
    pub fn time_bin(&self, index: usize) -> Bin {
        let lo = self.time_start + index as f64 * self.time_width;
        Bin {
            lo,
            hi: lo + self.time_width,
        }
    }

    /// Energy bin `index`.
    pub fn energy_bin(&self, index: usize) -> Bin {
        let lo = self.energy_min + index as f64 * self.energy_width;
        Bin {
            lo,
            hi: lo + self.energy_width,
        }
    }

    /// Midpoints of every energy bin.
    pub fn energy_centers(&self) -> Vec<f64> {
        (0..self.energy_bins)
            .map(|j| self.energy_min + (j as f64 + 0.5) * self.energy_width)
            .collect()
    }

    /// Stable text identifying the energy axis, used to validate cached tables.
    pub fn energy_fingerprint(&self) -> String {
        format!(
            "emin={:e};de={:e};ne={}",
            self.energy_min, self.energy_width, self.energy_bins
        )
    }
}
