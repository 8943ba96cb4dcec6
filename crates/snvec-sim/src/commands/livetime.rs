use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use log::info;
use serde::Serialize;
use snvec_core::RngHandle;
use snvec_gen::determinism::{livetime_seed, subrun_seed};
use snvec_gen::{plan_subrun_events, DiffuseGenerator, LivetimeTable, RunConfig, RunManifest, SubrunPlan};

use crate::output::write_subrun_segment;
use crate::{load_config, write_json};

#[derive(Args, Debug)]
pub struct LivetimeArgs {
    /// Whitespace-separated `run subrun seconds` table.
    #[arg(long)]
    pub table: PathBuf,
    /// First run, inclusive.
    #[arg(long)]
    pub run_begin: u32,
    /// Last run, exclusive.
    #[arg(long)]
    pub run_end: u32,
    /// Mean event rate per minute of live time.
    #[arg(long)]
    pub events_per_minute: f64,
    /// YAML configuration supplying the diffuse spectrum and output layout.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the master seed.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Output directory; without it only the plan is printed.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct LivetimeSummary<'a> {
    master_seed: u64,
    run_begin: u32,
    run_end: u32,
    events_per_minute: f64,
    expected_total: f64,
    written: u64,
    plans: &'a [SubrunPlan],
}

pub fn run(args: &LivetimeArgs) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => load_config(path, args.seed)?,
        None => {
            let mut config = RunConfig::default();
            if let Some(seed) = args.seed {
                config.seed_policy.master_seed = seed;
            }
            config
        }
    };
    let master_seed = config.seed_policy.master_seed;
    let table = LivetimeTable::load(&args.table)?;
    let mut plan_rng = RngHandle::from_seed(livetime_seed(master_seed));
    let plans = plan_subrun_events(
        &table,
        args.run_begin,
        args.run_end,
        args.events_per_minute,
        &mut plan_rng,
    )?;
    let expected_total: f64 = plans.iter().map(|plan| plan.expected).sum();

    let Some(out) = &args.out else {
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    };

    let spectrum = config.physics.diffuse.load_spectrum()?;
    let generator =
        DiffuseGenerator::new(&spectrum, &config.physics.diffuse, config.volume.resolve())?;
    let mut outputs = Vec::with_capacity(plans.len());
    let mut written = 0u64;
    for plan in &plans {
        let key = plan.key();
        let mut rng = RngHandle::from_seed(subrun_seed(master_seed, key));
        let outcome = generator.generate(plan.events, Some(key), &mut rng)?;
        outputs.push(write_subrun_segment(
            out,
            &config.output.prefix,
            key,
            &outcome.events,
        )?);
        written += outcome.events.len() as u64;
    }

    let summary = LivetimeSummary {
        master_seed,
        run_begin: args.run_begin,
        run_end: args.run_end,
        events_per_minute: args.events_per_minute,
        expected_total,
        written,
        plans: &plans,
    };
    write_json(out.join(&config.output.summary_file), &summary)?;

    let mut manifest = RunManifest::new("livetime", &config)?;
    manifest.outputs = outputs;
    manifest.events_written = written;
    manifest.expected_total = Some(expected_total);
    manifest.write(&out.join(&config.output.manifest_file))?;

    info!(
        "livetime: {} subruns, expected {expected_total:.2}, wrote {written} events",
        plans.len()
    );
    Ok(())
}
