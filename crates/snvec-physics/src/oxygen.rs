//! Tabulated charged- and neutral-current cross sections on 16O.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use snvec_core::channel::CC_SUB_CHANNELS;
use snvec_core::constants::ELECTRON_MASS;
use snvec_core::{
    io_error, CcExcitation, DecayChannel, DifferentialSample, ErrorInfo, Flavor, Nucleon,
    ReactionChannel, SnError,
};

use crate::interpolate::interpolate_linear_or_zero;

/// Energy transfer assumed for unresolved νe charged-current sub-reactions.
pub const NUE_SUB_CHANNEL_Q: f64 = 15.4;
/// Energy transfer assumed for unresolved ν̄e charged-current sub-reactions.
pub const NUEBAR_SUB_CHANNEL_Q: f64 = 11.4;

/// One resolved charged-current row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargedCurrentEntry {
    /// Incident flavor, electron-type only.
    pub flavor: Flavor,
    /// Nuclear state.
    pub state: u8,
    /// Excitation level within the state.
    pub level: u8,
    /// Decay channel.
    pub channel: DecayChannel,
    /// Energy transferred to the nucleus in MeV.
    pub q_value: f64,
    /// Cross section in cm² on the shared energy grid.
    pub values: Vec<f64>,
}

/// One sub-reaction folded into the unresolved channel of a state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubChannelEntry {
    /// Incident flavor, electron-type only.
    pub flavor: Flavor,
    /// Nuclear state.
    pub state: u8,
    /// Sub-reaction index.
    pub sub_channel: u8,
    /// Cross section in cm² on the shared energy grid.
    pub values: Vec<f64>,
}

/// One neutral-current row, shared by all flavors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeutralCurrentEntry {
    /// Ejected nucleon.
    pub nucleon: Nucleon,
    /// Residual-nucleus level.
    pub level: u8,
    /// Cross section in cm² on the shared energy grid.
    pub values: Vec<f64>,
}

/// Slope `a` of the `1 + a cosθ` lepton angular distribution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngularSlopes {
    /// νe charged current.
    #[serde(default)]
    pub nue: f64,
    /// ν̄e charged current.
    #[serde(default)]
    pub nuebar: f64,
}

/// On-disk layout of the oxygen cross-section tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OxygenTables {
    /// Shared neutrino energy grid in MeV, ascending.
    pub energies: Vec<f64>,
    /// Resolved charged-current rows.
    #[serde(default)]
    pub charged_current: Vec<ChargedCurrentEntry>,
    /// Unresolved charged-current sub-reactions.
    #[serde(default)]
    pub sub_channels: Vec<SubChannelEntry>,
    /// Neutral-current rows.
    #[serde(default)]
    pub neutral_current: Vec<NeutralCurrentEntry>,
    /// Charged-current angular slopes.
    #[serde(default)]
    pub angular_slope: AngularSlopes,
}

impl OxygenTables {
    /// Loads tables from YAML, or JSON when the extension says so.
    pub fn load(path: &Path) -> Result<Self, SnError> {
        let text = std::fs::read_to_string(path).map_err(|err| io_error(path, err))?;
        let parsed = if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            serde_json::from_str(&text).map_err(|err| err.to_string())
        } else {
            serde_yaml::from_str(&text).map_err(|err| err.to_string())
        };
        parsed.map_err(|message| {
            SnError::Serde(
                ErrorInfo::new("oxygen-parse", message)
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Row {
    q_value: f64,
    values: Vec<f64>,
}

/// Indexed oxygen cross sections ready for lookup by channel.
#[derive(Debug, Clone, PartialEq)]
pub struct OxygenCrossSections {
    energies: Vec<f64>,
    rows: BTreeMap<ReactionChannel, Row>,
    neutral: BTreeMap<(Nucleon, u8), Vec<f64>>,
    slopes: AngularSlopes,
}

impl OxygenCrossSections {
    /// Validates and indexes the tables.
    pub fn from_tables(tables: OxygenTables) -> Result<Self, SnError> {
        let energies = tables.energies;
        if energies.is_empty() || energies.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SnError::Model(ErrorInfo::new(
                "oxygen-grid",
                "energy grid must be non-empty and strictly ascending",
            )));
        }
        let check_len = |values: &[f64], what: String| {
            if values.len() == energies.len() {
                Ok(())
            } else {
                Err(SnError::Model(
                    ErrorInfo::new("oxygen-row", "row length differs from the energy grid")
                        .with_context("row", what)
                        .with_context("expected", energies.len().to_string())
                        .with_context("found", values.len().to_string()),
                ))
            }
        };

        let mut rows = BTreeMap::new();
        for entry in tables.charged_current {
            let channel = ReactionChannel::ChargedCurrentOxygen {
                flavor: entry.flavor,
                state: entry.state,
                excitation: CcExcitation::Level {
                    level: entry.level,
                    decay_channel: entry.channel,
                },
            };
            channel.encode().map_err(as_model_error)?;
            check_len(&entry.values, channel.label())?;
            rows.insert(
                channel,
                Row {
                    q_value: entry.q_value,
                    values: entry.values,
                },
            );
        }

        for entry in tables.sub_channels {
            let channel = ReactionChannel::ChargedCurrentOxygen {
                flavor: entry.flavor,
                state: entry.state,
                excitation: CcExcitation::UnresolvedSubChannel,
            };
            channel.encode().map_err(as_model_error)?;
            if entry.sub_channel >= CC_SUB_CHANNELS {
                return Err(SnError::Model(
                    ErrorInfo::new("oxygen-row", "sub-channel index out of range")
                        .with_context("sub_channel", entry.sub_channel.to_string()),
                ));
            }
            check_len(&entry.values, channel.label())?;
            let row = rows.entry(channel).or_insert_with(|| Row {
                q_value: sub_channel_q(entry.flavor),
                values: vec![0.0; energies.len()],
            });
            for (sum, value) in row.values.iter_mut().zip(&entry.values) {
                *sum += value;
            }
        }

        let mut neutral = BTreeMap::new();
        for entry in tables.neutral_current {
            if entry.level >= entry.nucleon.level_count() {
                return Err(SnError::Model(
                    ErrorInfo::new("oxygen-row", "neutral-current level out of range")
                        .with_context("level", entry.level.to_string()),
                ));
            }
            check_len(&entry.values, format!("nc {:?} l{}", entry.nucleon, entry.level))?;
            neutral.insert((entry.nucleon, entry.level), entry.values);
        }

        debug!(
            "indexed oxygen tables: {} charged-current rows, {} neutral-current rows",
            rows.len(),
            neutral.len()
        );
        Ok(Self {
            energies,
            rows,
            neutral,
            slopes: tables.angular_slope,
        })
    }

    /// Total cross section in cm².
    pub fn total(&self, channel: &ReactionChannel, energy: f64) -> f64 {
        match *channel {
            ReactionChannel::ChargedCurrentOxygen { .. } => self
                .rows
                .get(channel)
                .map_or(0.0, |row| interpolate_linear_or_zero(&self.energies, &row.values, energy)),
            ReactionChannel::NeutralCurrentOxygen { nucleon, level, .. } => self
                .neutral
                .get(&(nucleon, level))
                .map_or(0.0, |values| interpolate_linear_or_zero(&self.energies, values, energy)),
            _ => 0.0,
        }
    }

    /// Energy transferred to the nucleus, when the channel is tabulated.
    pub fn q_value(&self, channel: &ReactionChannel) -> Option<f64> {
        self.rows.get(channel).map(|row| row.q_value)
    }

    /// Neutrino energy at or below which the channel has no rate.
    ///
    /// Resolved levels close at Q + mₑ. The unresolved sub-channel rows
    /// count their tabulated rate at every energy; only event drawing stops
    /// below the assumed Q, see [`OxygenCrossSections::event_threshold`].
    pub fn threshold(&self, channel: &ReactionChannel) -> f64 {
        match *channel {
            ReactionChannel::ChargedCurrentOxygen {
                excitation: CcExcitation::UnresolvedSubChannel,
                ..
            } => 0.0,
            ReactionChannel::ChargedCurrentOxygen {
                excitation: CcExcitation::Level { .. },
                ..
            } => self.q_value(channel).unwrap_or(0.0) + ELECTRON_MASS,
            _ => 0.0,
        }
    }

    /// Neutrino energy at or below which no events are drawn.
    pub fn event_threshold(&self, channel: &ReactionChannel) -> f64 {
        match *channel {
            ReactionChannel::ChargedCurrentOxygen {
                flavor,
                excitation: CcExcitation::UnresolvedSubChannel,
                ..
            } => sub_channel_q(flavor),
            _ => self.threshold(channel),
        }
    }

    /// Lepton angular density and energy for a charged-current channel.
    ///
    /// Neutral-current channels are isotropic and leave the neutrino energy
    /// unchanged.
    pub fn differential(
        &self,
        channel: &ReactionChannel,
        energy: f64,
        cos_theta: f64,
    ) -> DifferentialSample {
        let total = self.total(channel, energy);
        match *channel {
            ReactionChannel::ChargedCurrentOxygen {
                flavor, excitation, ..
            } => {
                let q = match excitation {
                    CcExcitation::UnresolvedSubChannel => sub_channel_q(flavor),
                    CcExcitation::Level { .. } => self.q_value(channel).unwrap_or(0.0),
                };
                let lepton_energy = energy - q;
                if lepton_energy <= ELECTRON_MASS {
                    return DifferentialSample {
                        probability: 0.0,
                        secondary_energy: ELECTRON_MASS,
                    };
                }
                let slope = match flavor {
                    Flavor::ElectronAntineutrino => self.slopes.nuebar,
                    _ => self.slopes.nue,
                };
                DifferentialSample {
                    probability: 0.5 * total * (1.0 + slope * cos_theta).max(0.0),
                    secondary_energy: lepton_energy,
                }
            }
            _ => DifferentialSample {
                probability: 0.5 * total,
                secondary_energy: energy,
            },
        }
    }
}

/// Energy transfer used for the unresolved sub-channel of `flavor`.
pub fn sub_channel_q(flavor: Flavor) -> f64 {
    match flavor {
        Flavor::ElectronAntineutrino => NUEBAR_SUB_CHANNEL_Q,
        _ => NUE_SUB_CHANNEL_Q,
    }
}

fn as_model_error(err: SnError) -> SnError {
    SnError::Model(err.info().clone())
}
