use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use snvec_gen::run_rates;

use crate::{load_config, write_json};

#[derive(Args, Debug)]
pub struct RatesArgs {
    /// YAML configuration describing the run.
    #[arg(long)]
    pub config: PathBuf,
    /// Write the full rate report, including profiles, to this file.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &RatesArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(&args.config, None)?;
    let flux = config.physics.load_flux()?;
    let xsec = config.load_cross_sections()?;
    let report = run_rates(&config, &flux, &xsec)?;

    if let Some(path) = &args.out {
        write_json(path, &report)?;
    }
    let families = serde_json::json!({
        "distance_kpc": config.distance_kpc,
        "expected_total": report.expected_total,
        "families": report.families,
    });
    println!("{}", serde_json::to_string_pretty(&families)?);
    Ok(())
}
