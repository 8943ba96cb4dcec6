use snvec_core::RawEventRecord;

/// Append-only buffer of raw interaction records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventStore {
    records: Vec<RawEventRecord>,
}

impl EventStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one record.
    pub fn push(&mut self, record: RawEventRecord) {
        self.records.push(record);
    }

    /// Appends a batch of records in order.
    pub fn extend<I: IntoIterator<Item = RawEventRecord>>(&mut self, records: I) {
        self.records.extend(records);
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[RawEventRecord] {
        &self.records
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted by emission time; equal times keep insertion order.
    pub fn into_time_ordered(self) -> Vec<RawEventRecord> {
        let mut records = self.records;
        records.sort_by(|a, b| a.time.total_cmp(&b.time));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snvec_core::{Flavor, ReactionChannel};

    fn record(channel: ReactionChannel, time: f64) -> RawEventRecord {
        RawEventRecord {
            channel,
            time,
            energy: 20.0,
            direction: [0.0, 0.0, 1.0],
            vertex: [0.0; 3],
        }
    }

    #[test]
    fn ties_keep_insertion_order() {
        let elastic = ReactionChannel::ElasticScattering {
            flavor: Flavor::ElectronNeutrino,
        };
        let mut store = EventStore::new();
        store.push(record(ReactionChannel::InverseBetaDecay, 0.5));
        store.push(record(elastic, 0.1));
        store.push(record(elastic, 0.5));
        store.push(record(ReactionChannel::InverseBetaDecay, 0.1));

        let ordered = store.into_time_ordered();
        let seen: Vec<(f64, ReactionChannel)> =
            ordered.iter().map(|r| (r.time, r.channel)).collect();
        assert_eq!(
            seen,
            vec![
                (0.1, elastic),
                (0.1, ReactionChannel::InverseBetaDecay),
                (0.5, ReactionChannel::InverseBetaDecay),
                (0.5, elastic),
            ]
        );
    }
}
