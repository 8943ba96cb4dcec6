//! Reaction channels and their packed integer identifiers.
//!
//! Identifier layout:
//!
//! * `0` inverse beta decay, `1..=4` elastic scattering by flavor.
//! * `3FNL` neutral-current oxygen: flavor `F`, ejected nucleon `N`, level `L`
//!   (each stored plus one).
//! * `FSLLLC` charged-current oxygen: flavor `F`, nuclear state `S`, three
//!   digits of excitation level `LLL` and decay channel `C` (each plus one).
//!   The unresolved sub-channel occupies level field `030` with channel `9`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, SnError};

/// Number of excitation levels per charged-current nuclear state.
pub const CC_STATE_LEVELS: [u8; 5] = [3, 15, 8, 1, 16];

/// Number of charged-current nuclear states.
pub const CC_STATES: u8 = CC_STATE_LEVELS.len() as u8;

/// Number of sub-reactions folded into one unresolved charged-current channel.
pub const CC_SUB_CHANNELS: u8 = 32;

const NC_BASE: u32 = 3000;
const CC_UNRESOLVED_LEVEL_FIELD: u32 = 30;
const CC_UNRESOLVED_CHANNEL_FIELD: u32 = 9;

/// Neutrino species tracked by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flavor {
    /// Electron neutrino.
    ElectronNeutrino,
    /// Electron antineutrino.
    ElectronAntineutrino,
    /// Muon or tau neutrino.
    HeavyNeutrino,
    /// Muon or tau antineutrino.
    HeavyAntineutrino,
}

impl Flavor {
    /// All flavors in index order.
    pub const ALL: [Flavor; 4] = [
        Flavor::ElectronNeutrino,
        Flavor::ElectronAntineutrino,
        Flavor::HeavyNeutrino,
        Flavor::HeavyAntineutrino,
    ];

    /// Zero-based index used by the identifier layout.
    pub fn index(self) -> u32 {
        match self {
            Flavor::ElectronNeutrino => 0,
            Flavor::ElectronAntineutrino => 1,
            Flavor::HeavyNeutrino => 2,
            Flavor::HeavyAntineutrino => 3,
        }
    }

    /// Inverse of [`Flavor::index`].
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// PDG particle code of the neutrino.
    pub fn pdg_code(self) -> i32 {
        match self {
            Flavor::ElectronNeutrino => 12,
            Flavor::ElectronAntineutrino => -12,
            Flavor::HeavyNeutrino => 14,
            Flavor::HeavyAntineutrino => -14,
        }
    }

    /// Short label used in reports.
    pub fn short_name(self) -> &'static str {
        match self {
            Flavor::ElectronNeutrino => "nue",
            Flavor::ElectronAntineutrino => "nuebar",
            Flavor::HeavyNeutrino => "nux",
            Flavor::HeavyAntineutrino => "nuxbar",
        }
    }
}

/// Nucleon knocked out in a neutral-current oxygen reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nucleon {
    /// Proton emission, leaving 15N.
    Proton,
    /// Neutron emission, leaving 15O.
    Neutron,
}

impl Nucleon {
    /// Both nucleons in index order.
    pub const ALL: [Nucleon; 2] = [Nucleon::Proton, Nucleon::Neutron];

    /// Zero-based index used by the identifier layout.
    pub fn index(self) -> u32 {
        match self {
            Nucleon::Proton => 0,
            Nucleon::Neutron => 1,
        }
    }

    /// Inverse of [`Nucleon::index`].
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Number of residual-nucleus levels with a tabulated de-excitation gamma.
    pub fn level_count(self) -> u8 {
        match self {
            Nucleon::Proton => 8,
            Nucleon::Neutron => 4,
        }
    }

    /// PDG particle code.
    pub fn pdg_code(self) -> i32 {
        match self {
            Nucleon::Proton => 2212,
            Nucleon::Neutron => 2112,
        }
    }

    /// Rest mass in MeV.
    pub fn mass(self) -> f64 {
        match self {
            Nucleon::Proton => crate::constants::PROTON_MASS,
            Nucleon::Neutron => crate::constants::NEUTRON_MASS,
        }
    }
}

/// Particle-emission channel following a charged-current excitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayChannel {
    /// Gamma emission only.
    Gamma,
    /// One proton.
    Proton,
    /// One neutron.
    Neutron,
    /// One alpha.
    Alpha,
    /// Two protons.
    TwoProtons,
    /// A proton and a neutron.
    ProtonNeutron,
    /// Two neutrons.
    TwoNeutrons,
}

impl DecayChannel {
    /// All decay channels in index order.
    pub const ALL: [DecayChannel; 7] = [
        DecayChannel::Gamma,
        DecayChannel::Proton,
        DecayChannel::Neutron,
        DecayChannel::Alpha,
        DecayChannel::TwoProtons,
        DecayChannel::ProtonNeutron,
        DecayChannel::TwoNeutrons,
    ];

    /// Zero-based index used by the identifier layout.
    pub fn index(self) -> u32 {
        match self {
            DecayChannel::Gamma => 0,
            DecayChannel::Proton => 1,
            DecayChannel::Neutron => 2,
            DecayChannel::Alpha => 3,
            DecayChannel::TwoProtons => 4,
            DecayChannel::ProtonNeutron => 5,
            DecayChannel::TwoNeutrons => 6,
        }
    }

    /// Inverse of [`DecayChannel::index`].
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Number of neutrons emitted by the channel.
    pub fn neutrons(self) -> usize {
        match self {
            DecayChannel::Neutron | DecayChannel::ProtonNeutron => 1,
            DecayChannel::TwoNeutrons => 2,
            _ => 0,
        }
    }
}

/// Excitation of the residual nucleus in a charged-current oxygen reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CcExcitation {
    /// A resolved level decaying through a specific channel.
    Level {
        /// Zero-based level index within the nuclear state.
        level: u8,
        /// Particle-emission channel.
        decay_channel: DecayChannel,
    },
    /// Aggregate of all sub-reactions; produces a two-body final state.
    UnresolvedSubChannel,
}

/// Coarse grouping of channels used for normalization and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelFamily {
    /// Antineutrino capture on free protons.
    InverseBetaDecay,
    /// Neutrino-electron elastic scattering.
    Elastic,
    /// Charged-current interaction on oxygen.
    ChargedCurrentOxygen,
    /// Neutral-current interaction on oxygen.
    NeutralCurrentOxygen,
}

/// Which channel families take part in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSelection {
    /// Inverse beta decay.
    #[serde(default = "enabled")]
    pub inverse_beta_decay: bool,
    /// Elastic scattering, all flavors.
    #[serde(default = "enabled")]
    pub elastic: bool,
    /// Charged-current oxygen, resolved and unresolved.
    #[serde(default = "enabled")]
    pub cc_oxygen: bool,
    /// Neutral-current oxygen.
    #[serde(default = "enabled")]
    pub nc_oxygen: bool,
}

fn enabled() -> bool {
    true
}

impl Default for ChannelSelection {
    fn default() -> Self {
        Self {
            inverse_beta_decay: true,
            elastic: true,
            cc_oxygen: true,
            nc_oxygen: true,
        }
    }
}

impl ChannelSelection {
    /// Selection containing only inverse beta decay.
    pub fn inverse_beta_decay_only() -> Self {
        Self {
            inverse_beta_decay: true,
            elastic: false,
            cc_oxygen: false,
            nc_oxygen: false,
        }
    }

    /// Whether the family is selected.
    pub fn includes(&self, family: ChannelFamily) -> bool {
        match family {
            ChannelFamily::InverseBetaDecay => self.inverse_beta_decay,
            ChannelFamily::Elastic => self.elastic,
            ChannelFamily::ChargedCurrentOxygen => self.cc_oxygen,
            ChannelFamily::NeutralCurrentOxygen => self.nc_oxygen,
        }
    }
}

/// A fully specified reaction variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "reaction", rename_all = "snake_case")]
pub enum ReactionChannel {
    /// Electron antineutrino capture on a free proton.
    InverseBetaDecay,
    /// Neutrino-electron elastic scattering.
    ElasticScattering {
        /// Incident flavor.
        flavor: Flavor,
    },
    /// Charged-current interaction on 16O.
    ChargedCurrentOxygen {
        /// Incident flavor, electron-type only.
        flavor: Flavor,
        /// Zero-based nuclear state.
        state: u8,
        /// Excitation of the residual nucleus.
        excitation: CcExcitation,
    },
    /// Neutral-current nucleon knock-out on 16O.
    NeutralCurrentOxygen {
        /// Incident flavor.
        flavor: Flavor,
        /// Ejected nucleon.
        nucleon: Nucleon,
        /// Zero-based level of the residual nucleus.
        level: u8,
    },
}

impl ReactionChannel {
    /// Packs the channel into its integer identifier.
    pub fn encode(&self) -> Result<u32, SnError> {
        match *self {
            ReactionChannel::InverseBetaDecay => Ok(0),
            ReactionChannel::ElasticScattering { flavor } => Ok(1 + flavor.index()),
            ReactionChannel::NeutralCurrentOxygen {
                flavor,
                nucleon,
                level,
            } => {
                if level >= nucleon.level_count() {
                    return Err(out_of_range(self, "level", level as u32));
                }
                Ok(NC_BASE
                    + (flavor.index() + 1) * 100
                    + (nucleon.index() + 1) * 10
                    + (level as u32 + 1))
            }
            ReactionChannel::ChargedCurrentOxygen {
                flavor,
                state,
                excitation,
            } => {
                if flavor.index() > 1 {
                    return Err(out_of_range(self, "flavor", flavor.index()));
                }
                if state >= CC_STATES {
                    return Err(out_of_range(self, "state", state as u32));
                }
                let head = (flavor.index() + 1) * 100_000 + (state as u32 + 1) * 10_000;
                match excitation {
                    CcExcitation::Level {
                        level,
                        decay_channel,
                    } => {
                        if level >= CC_STATE_LEVELS[state as usize] {
                            return Err(out_of_range(self, "level", level as u32));
                        }
                        Ok(head + (level as u32 + 1) * 10 + decay_channel.index() + 1)
                    }
                    CcExcitation::UnresolvedSubChannel => {
                        Ok(head + CC_UNRESOLVED_LEVEL_FIELD * 10 + CC_UNRESOLVED_CHANNEL_FIELD)
                    }
                }
            }
        }
    }

    /// Unpacks an integer identifier.
    pub fn decode(id: u32) -> Result<Self, SnError> {
        match id {
            0 => Ok(ReactionChannel::InverseBetaDecay),
            1..=4 => Flavor::from_index(id - 1)
                .map(|flavor| ReactionChannel::ElasticScattering { flavor })
                .ok_or_else(|| unrecognized(id)),
            1001..=9999 => decode_neutral_current(id).ok_or_else(|| unrecognized(id)),
            _ if id >= 10_000 => decode_charged_current(id).ok_or_else(|| unrecognized(id)),
            _ => Err(unrecognized(id)),
        }
    }

    /// Family the channel belongs to.
    pub fn family(&self) -> ChannelFamily {
        match self {
            ReactionChannel::InverseBetaDecay => ChannelFamily::InverseBetaDecay,
            ReactionChannel::ElasticScattering { .. } => ChannelFamily::Elastic,
            ReactionChannel::ChargedCurrentOxygen { .. } => ChannelFamily::ChargedCurrentOxygen,
            ReactionChannel::NeutralCurrentOxygen { .. } => ChannelFamily::NeutralCurrentOxygen,
        }
    }

    /// Incident flavor, which also selects the mixing weights.
    pub fn flavor(&self) -> Flavor {
        match *self {
            ReactionChannel::InverseBetaDecay => Flavor::ElectronAntineutrino,
            ReactionChannel::ElasticScattering { flavor }
            | ReactionChannel::ChargedCurrentOxygen { flavor, .. }
            | ReactionChannel::NeutralCurrentOxygen { flavor, .. } => flavor,
        }
    }

    /// Human readable label used in reports.
    pub fn label(&self) -> String {
        match *self {
            ReactionChannel::InverseBetaDecay => "nuebar+p".to_string(),
            ReactionChannel::ElasticScattering { flavor } => format!("{}+e", flavor.short_name()),
            ReactionChannel::ChargedCurrentOxygen {
                flavor,
                state,
                excitation,
            } => match excitation {
                CcExcitation::Level {
                    level,
                    decay_channel,
                } => format!(
                    "{}+16O CC s{state} l{level} c{}",
                    flavor.short_name(),
                    decay_channel.index()
                ),
                CcExcitation::UnresolvedSubChannel => {
                    format!("{}+16O CC s{state} sub", flavor.short_name())
                }
            },
            ReactionChannel::NeutralCurrentOxygen {
                flavor,
                nucleon,
                level,
            } => {
                let tag = match nucleon {
                    Nucleon::Proton => "p",
                    Nucleon::Neutron => "n",
                };
                format!("{}+16O NC {tag} l{level}", flavor.short_name())
            }
        }
    }

    /// Every channel of the selected families in canonical order.
    ///
    /// This order fixes the per-cell iteration order of the rate integrator.
    pub fn catalogue(selection: &ChannelSelection) -> Vec<ReactionChannel> {
        let mut channels = Vec::new();
        if selection.includes(ChannelFamily::InverseBetaDecay) {
            channels.push(ReactionChannel::InverseBetaDecay);
        }
        if selection.includes(ChannelFamily::Elastic) {
            channels.extend(
                Flavor::ALL
                    .iter()
                    .map(|&flavor| ReactionChannel::ElasticScattering { flavor }),
            );
        }
        if selection.includes(ChannelFamily::ChargedCurrentOxygen) {
            for flavor in [Flavor::ElectronNeutrino, Flavor::ElectronAntineutrino] {
                for state in 0..CC_STATES {
                    for level in 0..CC_STATE_LEVELS[state as usize] {
                        for decay_channel in DecayChannel::ALL {
                            channels.push(ReactionChannel::ChargedCurrentOxygen {
                                flavor,
                                state,
                                excitation: CcExcitation::Level {
                                    level,
                                    decay_channel,
                                },
                            });
                        }
                    }
                    channels.push(ReactionChannel::ChargedCurrentOxygen {
                        flavor,
                        state,
                        excitation: CcExcitation::UnresolvedSubChannel,
                    });
                }
            }
        }
        if selection.includes(ChannelFamily::NeutralCurrentOxygen) {
            for flavor in Flavor::ALL {
                for nucleon in Nucleon::ALL {
                    for level in 0..nucleon.level_count() {
                        channels.push(ReactionChannel::NeutralCurrentOxygen {
                            flavor,
                            nucleon,
                            level,
                        });
                    }
                }
            }
        }
        channels
    }
}

impl fmt::Display for ReactionChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn decode_neutral_current(id: u32) -> Option<ReactionChannel> {
    if id / 1000 != NC_BASE / 1000 {
        return None;
    }
    let flavor = Flavor::from_index(((id / 100) % 10).checked_sub(1)?)?;
    let nucleon = Nucleon::from_index(((id / 10) % 10).checked_sub(1)?)?;
    let level = (id % 10).checked_sub(1)?;
    if level >= nucleon.level_count() as u32 {
        return None;
    }
    Some(ReactionChannel::NeutralCurrentOxygen {
        flavor,
        nucleon,
        level: level as u8,
    })
}

fn decode_charged_current(id: u32) -> Option<ReactionChannel> {
    let flavor = match id / 100_000 {
        1 => Flavor::ElectronNeutrino,
        2 => Flavor::ElectronAntineutrino,
        _ => return None,
    };
    let state = ((id / 10_000) % 10).checked_sub(1)?;
    if state >= CC_STATES as u32 {
        return None;
    }
    let level_field = (id / 10) % 1000;
    let channel_field = id % 10;
    let excitation =
        if level_field == CC_UNRESOLVED_LEVEL_FIELD && channel_field == CC_UNRESOLVED_CHANNEL_FIELD {
            CcExcitation::UnresolvedSubChannel
        } else {
            let level = level_field.checked_sub(1)?;
            if level >= CC_STATE_LEVELS[state as usize] as u32 {
                return None;
            }
            CcExcitation::Level {
                level: level as u8,
                decay_channel: DecayChannel::from_index(channel_field.checked_sub(1)?)?,
            }
        };
    Some(ReactionChannel::ChargedCurrentOxygen {
        flavor,
        state: state as u8,
        excitation,
    })
}

fn unrecognized(id: u32) -> SnError {
    SnError::Codec(
        ErrorInfo::new(
            "unrecognized-channel",
            "identifier does not map to any reaction channel",
        )
        .with_context("id", id.to_string()),
    )
}

fn out_of_range(channel: &ReactionChannel, field: &str, value: u32) -> SnError {
    SnError::Codec(
        ErrorInfo::new("field-out-of-range", "channel field exceeds its declared range")
            .with_context("channel", format!("{channel:?}"))
            .with_context("field", field)
            .with_context("value", value.to_string()),
    )
}
