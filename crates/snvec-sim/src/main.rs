use std::error::Error;
use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};
use commands::{
    burst::{self, BurstArgs},
    decode::{self, DecodeArgs},
    diffuse::{self, DiffuseArgs},
    livetime::{self, LivetimeArgs},
    rates::{self, RatesArgs},
};
use snvec_gen::RunConfig;

mod commands;
mod output;

#[derive(Parser, Debug)]
#[command(name = "snvec-sim", about = "Supernova neutrino event vector generator")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a burst sample and write event segments.
    Burst(BurstArgs),
    /// Integrate expected rates without drawing events.
    Rates(RatesArgs),
    /// Generate diffuse inverse beta decay events.
    Diffuse(DiffuseArgs),
    /// Plan diffuse events over recorded subruns.
    Livetime(LivetimeArgs),
    /// Decode a packed reaction identifier.
    Decode(DecodeArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Command::Burst(args) => burst::run(&args),
        Command::Rates(args) => rates::run(&args),
        Command::Diffuse(args) => diffuse::run(&args),
        Command::Livetime(args) => livetime::run(&args),
        Command::Decode(args) => decode::run(&args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Loads a configuration, applying a seed override before validation.
pub(crate) fn load_config(path: &Path, seed: Option<u64>) -> Result<RunConfig, Box<dyn Error>> {
    let mut config = RunConfig::load(path)?;
    if let Some(seed) = seed {
        config.seed_policy.master_seed = seed;
    }
    config.validate()?;
    Ok(config)
}

pub(crate) fn write_json<P: AsRef<Path>, T: serde::Serialize>(
    path: P,
    value: &T,
) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
