//! Total cross sections tabulated at the energy-bin centres.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use snvec_core::{io_error, CrossSectionModel, ErrorInfo, ReactionChannel, SnError};

use crate::grid::EnergyTimeGrid;

/// Per-channel total cross sections on the energy axis of a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSectionGrid {
    fingerprint: String,
    channels: Vec<ReactionChannel>,
    values: Vec<Vec<f64>>,
    event_thresholds: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct CachedGrid {
    fingerprint: String,
    channels: Vec<u32>,
    values: Vec<Vec<f64>>,
    event_thresholds: Vec<f64>,
}

impl CrossSectionGrid {
    /// Samples `model` at every energy-bin centre for every channel.
    ///
    /// Centres at or below a channel's threshold get zero without consulting
    /// the model. Each channel's event threshold is recorded alongside.
    pub fn build<M: CrossSectionModel + ?Sized>(
        grid: &EnergyTimeGrid,
        model: &M,
        channels: &[ReactionChannel],
    ) -> Result<Self, SnError> {
        let centers = grid.energy_centers();
        let mut values = Vec::with_capacity(channels.len());
        for channel in channels {
            let threshold = model.threshold(channel);
            let mut row = Vec::with_capacity(centers.len());
            for &energy in &centers {
                let sigma = if energy > threshold {
                    model.total(channel, energy)
                } else {
                    0.0
                };
                if !sigma.is_finite() || sigma < 0.0 {
                    return Err(SnError::Model(
                        ErrorInfo::new("cross-section-value", "cross section must be finite and non-negative")
                            .with_context("channel", channel.label())
                            .with_context("energy", energy.to_string())
                            .with_context("value", sigma.to_string()),
                    ));
                }
                row.push(sigma);
            }
            values.push(row);
        }
        debug!(
            "tabulated {} channels over {} energy bins",
            channels.len(),
            centers.len()
        );
        Ok(Self {
            fingerprint: grid.energy_fingerprint(),
            channels: channels.to_vec(),
            values,
            event_thresholds: channels.iter().map(|c| model.event_threshold(c)).collect(),
        })
    }

    /// Channels in table order.
    pub fn channels(&self) -> &[ReactionChannel] {
        &self.channels
    }

    /// Cross section of channel `channel_index` in energy bin `energy_bin`.
    pub fn total(&self, channel_index: usize, energy_bin: usize) -> f64 {
        self.values[channel_index][energy_bin]
    }

    /// Neutrino energy at or below which channel `channel_index` draws no events.
    pub fn event_threshold(&self, channel_index: usize) -> f64 {
        self.event_thresholds[channel_index]
    }

    /// Full row of one channel.
    pub fn row(&self, channel_index: usize) -> &[f64] {
        &self.values[channel_index]
    }

    /// Energy-axis fingerprint the table was built for.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Writes the table as JSON.
    pub fn save(&self, path: &Path) -> Result<(), SnError> {
        let cached = CachedGrid {
            fingerprint: self.fingerprint.clone(),
            channels: self
                .channels
                .iter()
                .map(ReactionChannel::encode)
                .collect::<Result<_, _>>()?,
            values: self.values.clone(),
            event_thresholds: self.event_thresholds.clone(),
        };
        let json = serde_json::to_string(&cached).map_err(|err| {
            SnError::Serde(
                ErrorInfo::new("xsec-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| io_error(path, err))
    }

    /// Reads a table written by [`CrossSectionGrid::save`].
    pub fn load(path: &Path) -> Result<Self, SnError> {
        let contents = fs::read_to_string(path).map_err(|err| io_error(path, err))?;
        let cached: CachedGrid = serde_json::from_str(&contents).map_err(|err| {
            SnError::Serde(
                ErrorInfo::new("xsec-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        if cached.values.len() != cached.channels.len()
            || cached.event_thresholds.len() != cached.channels.len()
        {
            return Err(SnError::Serde(
                ErrorInfo::new("xsec-parse", "row count differs from channel count")
                    .with_context("path", path.display().to_string()),
            ));
        }
        let channels = cached
            .channels
            .into_iter()
            .map(ReactionChannel::decode)
            .collect::<Result<_, _>>()?;
        Ok(Self {
            fingerprint: cached.fingerprint,
            channels,
            values: cached.values,
            event_thresholds: cached.event_thresholds,
        })
    }

    /// Loads a cached table and checks it matches `grid` and `channels`.
    pub fn load_for(
        path: &Path,
        grid: &EnergyTimeGrid,
        channels: &[ReactionChannel],
    ) -> Result<Self, SnError> {
        let table = Self::load(path)?;
        if table.fingerprint != grid.energy_fingerprint() {
            return Err(SnError::Config(
                ErrorInfo::new("xsec-cache-mismatch", "cached table was built for another energy grid")
                    .with_context("cached", table.fingerprint.clone())
                    .with_context("expected", grid.energy_fingerprint())
                    .with_hint("delete the cache or rebuild it for this grid"),
            ));
        }
        if table.channels != channels {
            return Err(SnError::Config(
                ErrorInfo::new("xsec-cache-mismatch", "cached table covers other channels")
                    .with_context("cached", table.channels.len().to_string())
                    .with_context("expected", channels.len().to_string()),
            ));
        }
        Ok(table)
    }
}
