use std::fs::File;
use std::io::Write;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use snvec_core::{io_error, ChannelFamily, ReactionChannel, SnError};

/// Running totals for one reaction channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelTotals {
    /// Sum of expected rates over every grid cell.
    pub expected: f64,
    /// Raw records drawn by the event-count sampler.
    pub generated: u64,
    /// Records dropped during final-state expansion.
    pub skipped: u64,
}

impl ChannelTotals {
    fn absorb(&mut self, other: &ChannelTotals) {
        self.expected += other.expected;
        self.generated += other.generated;
        self.skipped += other.skipped;
    }
}

/// Report line for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelReport {
    /// Packed reaction identifier.
    pub id: u32,
    /// Human readable label.
    pub label: String,
    /// Channel family.
    pub family: ChannelFamily,
    /// Accumulated totals.
    pub totals: ChannelTotals,
}

/// Totals summed over a channel family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyTotals {
    /// Channel family.
    pub family: ChannelFamily,
    /// Summed totals.
    pub totals: ChannelTotals,
}

/// Per-channel totals kept in catalogue order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelAccumulator {
    totals: IndexMap<ReactionChannel, ChannelTotals>,
}

impl ChannelAccumulator {
    /// Creates zeroed entries for `channels`, preserving their order.
    pub fn new(channels: &[ReactionChannel]) -> Self {
        Self {
            totals: channels
                .iter()
                .map(|channel| (*channel, ChannelTotals::default()))
                .collect(),
        }
    }

    fn entry(&mut self, channel: ReactionChannel) -> &mut ChannelTotals {
        self.totals.entry(channel).or_default()
    }

    /// Adds an expected rate.
    pub fn add_expected(&mut self, channel: ReactionChannel, rate: f64) {
        self.entry(channel).expected += rate;
    }

    /// Counts freshly drawn raw records.
    pub fn add_generated(&mut self, channel: ReactionChannel, count: u64) {
        self.entry(channel).generated += count;
    }

    /// Counts a record dropped during expansion.
    pub fn add_skipped(&mut self, channel: ReactionChannel) {
        self.entry(channel).skipped += 1;
    }

    /// Totals for one channel.
    pub fn get(&self, channel: &ReactionChannel) -> Option<&ChannelTotals> {
        self.totals.get(channel)
    }

    /// Iterates channels in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ReactionChannel, &ChannelTotals)> {
        self.totals.iter()
    }

    /// Number of tracked channels.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Whether no channel is tracked.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Zeroes every entry, keeping the channel list.
    pub fn reset(&mut self) {
        for totals in self.totals.values_mut() {
            *totals = ChannelTotals::default();
        }
    }

    /// Sum over all channels.
    pub fn grand_total(&self) -> ChannelTotals {
        let mut sum = ChannelTotals::default();
        for totals in self.totals.values() {
            sum.absorb(totals);
        }
        sum
    }

    /// Totals per family, in order of first appearance.
    pub fn family_totals(&self) -> Vec<FamilyTotals> {
        let mut families: IndexMap<ChannelFamily, ChannelTotals> = IndexMap::new();
        for (channel, totals) in &self.totals {
            families.entry(channel.family()).or_default().absorb(totals);
        }
        families
            .into_iter()
            .map(|(family, totals)| FamilyTotals { family, totals })
            .collect()
    }

    /// One report per channel.
    pub fn reports(&self) -> Result<Vec<ChannelReport>, SnError> {
        self.totals
            .iter()
            .map(|(channel, totals)| {
                Ok(ChannelReport {
                    id: channel.encode()?,
                    label: channel.label(),
                    family: channel.family(),
                    totals: *totals,
                })
            })
            .collect()
    }

    /// Writes the per-channel totals as CSV.
    pub fn write_csv(&self, path: &Path) -> Result<(), SnError> {
        write_reports_csv(path, &self.reports()?)
    }
}

/// Writes channel reports as `id,label,expected,generated,skipped` rows.
pub fn write_reports_csv(path: &Path, reports: &[ChannelReport]) -> Result<(), SnError> {
    let mut file = File::create(path).map_err(|err| io_error(path, err))?;
    writeln!(file, "id,label,expected,generated,skipped").map_err(|err| io_error(path, err))?;
    for report in reports {
        writeln!(
            file,
            "{},{},{:.6e},{},{}",
            report.id,
            report.label,
            report.totals.expected,
            report.totals.generated,
            report.totals.skipped
        )
        .map_err(|err| io_error(path, err))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snvec_core::{ChannelSelection, Flavor};

    #[test]
    fn family_totals_sum_members() {
        let channels = ReactionChannel::catalogue(&ChannelSelection {
            cc_oxygen: false,
            nc_oxygen: false,
            ..ChannelSelection::default()
        });
        let mut acc = ChannelAccumulator::new(&channels);
        acc.add_expected(ReactionChannel::InverseBetaDecay, 2.0);
        acc.add_expected(
            ReactionChannel::ElasticScattering {
                flavor: Flavor::ElectronNeutrino,
            },
            0.5,
        );
        acc.add_expected(
            ReactionChannel::ElasticScattering {
                flavor: Flavor::HeavyNeutrino,
            },
            0.25,
        );
        let families = acc.family_totals();
        assert_eq!(families.len(), 2);
        assert_eq!(families[0].family, ChannelFamily::InverseBetaDecay);
        assert_eq!(families[0].totals.expected, 2.0);
        assert_eq!(families[1].totals.expected, 0.75);

        acc.reset();
        assert_eq!(acc.len(), 5);
        assert_eq!(acc.grand_total(), ChannelTotals::default());
    }

    #[test]
    fn csv_lists_channels_in_catalogue_order() {
        let channels = ReactionChannel::catalogue(&ChannelSelection::inverse_beta_decay_only());
        let mut acc = ChannelAccumulator::new(&channels);
        acc.add_expected(ReactionChannel::InverseBetaDecay, 1.5);
        acc.add_generated(ReactionChannel::InverseBetaDecay, 2);
        acc.add_skipped(ReactionChannel::InverseBetaDecay);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("channels.csv");
        acc.write_csv(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["id,label,expected,generated,skipped", "0,nuebar+p,1.500000e0,2,1"]);
    }
}
