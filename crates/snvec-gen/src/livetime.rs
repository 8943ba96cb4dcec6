//! Livetime-weighted event counts per detector subrun.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use snvec_core::{io_error, ErrorInfo, RandomSource, RunPeriodLookup, SnError, SubrunKey};

/// Rounds `expected` to an integer without bias.
///
/// The fractional part `f` turns into one extra count unless `f < u` for a
/// single draw `u ~ U(0, 1)`.
pub fn stochastic_round<R: RandomSource + ?Sized>(expected: f64, rng: &mut R) -> u64 {
    if !(expected > 0.0) || !expected.is_finite() {
        return 0;
    }
    let base = expected.floor();
    let fraction = expected - base;
    let u = rng.uniform(0.0, 1.0);
    let extra = if fraction < u { 0 } else { 1 };
    base as u64 + extra
}

/// Subrun livetimes read from a whitespace separated text file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LivetimeTable {
    entries: BTreeMap<SubrunKey, f64>,
}

impl LivetimeTable {
    /// Parses `run subrun livetime_s [...]` lines; blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self, SnError> {
        let mut entries = BTreeMap::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            let parse_error = |message: &str| {
                SnError::Serde(
                    ErrorInfo::new("livetime-parse", message)
                        .with_context("line", (index + 1).to_string())
                        .with_context("text", line),
                )
            };
            if fields.len() < 3 {
                return Err(parse_error("expected run, subrun and livetime columns"));
            }
            let run = fields[0]
                .parse::<u32>()
                .map_err(|_| parse_error("run is not an unsigned integer"))?;
            let subrun = fields[1]
                .parse::<u32>()
                .map_err(|_| parse_error("subrun is not an unsigned integer"))?;
            let livetime = fields[2]
                .parse::<f64>()
                .map_err(|_| parse_error("livetime is not a number"))?;
            if !(livetime >= 0.0) || !livetime.is_finite() {
                return Err(parse_error("livetime must be finite and non-negative"));
            }
            entries.insert(SubrunKey { run, subrun }, livetime);
        }
        Ok(Self { entries })
    }

    /// Reads and parses a livetime file.
    pub fn load(path: &Path) -> Result<Self, SnError> {
        let text = fs::read_to_string(path).map_err(|err| io_error(path, err))?;
        Self::parse(&text).map_err(|err| {
            SnError::Serde(err.info().clone().with_context("path", path.display().to_string()))
        })
    }

    /// Number of subruns listed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table lists no subruns.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RunPeriodLookup for LivetimeTable {
    fn livetime_seconds(&self, run: u32, subrun: u32) -> Option<f64> {
        self.entries.get(&SubrunKey { run, subrun }).copied()
    }

    fn subruns(&self, run_begin: u32, run_end: u32) -> Vec<SubrunKey> {
        self.entries
            .keys()
            .filter(|key| key.run >= run_begin && key.run < run_end)
            .copied()
            .collect()
    }
}

/// Planned event count for one subrun.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubrunPlan {
    /// Run number.
    pub run: u32,
    /// Subrun number.
    pub subrun: u32,
    /// Live time in seconds.
    pub livetime: f64,
    /// Continuous expected count.
    pub expected: f64,
    /// Integer count after stochastic rounding.
    pub events: u64,
}

impl SubrunPlan {
    /// Key of the planned subrun.
    pub fn key(&self) -> SubrunKey {
        SubrunKey {
            run: self.run,
            subrun: self.subrun,
        }
    }
}

/// Plans counts for every subrun with `run_begin <= run < run_end`.
///
/// The expected count is `livetime · events_per_minute / 60`.
pub fn plan_subrun_events<L, R>(
    lookup: &L,
    run_begin: u32,
    run_end: u32,
    events_per_minute: f64,
    rng: &mut R,
) -> Result<Vec<SubrunPlan>, SnError>
where
    L: RunPeriodLookup + ?Sized,
    R: RandomSource + ?Sized,
{
    if !(events_per_minute >= 0.0) || !events_per_minute.is_finite() {
        return Err(SnError::Config(
            ErrorInfo::new("invalid-config", "event rate must be finite and non-negative")
                .with_context("field", "events_per_minute")
                .with_context("value", events_per_minute.to_string()),
        ));
    }
    if run_end <= run_begin {
        return Err(SnError::Config(
            ErrorInfo::new("invalid-config", "run range is empty")
                .with_context("field", "run_begin/run_end")
                .with_context("value", format!("{run_begin}..{run_end}")),
        ));
    }
    let mut plans = Vec::new();
    for key in lookup.subruns(run_begin, run_end) {
        let Some(livetime) = lookup.livetime_seconds(key.run, key.subrun) else {
            continue;
        };
        let expected = livetime * events_per_minute / 60.0;
        plans.push(SubrunPlan {
            run: key.run,
            subrun: key.subrun,
            livetime,
            expected,
            events: stochastic_round(expected, rng),
        });
    }
    debug!(
        "planned {} events over {} subruns",
        plans.iter().map(|plan| plan.events).sum::<u64>(),
        plans.len()
    );
    Ok(plans)
}
