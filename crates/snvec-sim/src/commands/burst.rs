use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use log::info;
use snvec_gen::run::{build_table, selected_channels};
use snvec_gen::{run_burst_with_table, write_reports_csv, CrossSectionGrid, RunManifest};

use crate::output::SegmentedJsonWriter;
use crate::{load_config, write_json};

#[derive(Args, Debug)]
pub struct BurstArgs {
    /// YAML configuration describing the run.
    #[arg(long)]
    pub config: PathBuf,
    /// Output directory for event segments and run artefacts.
    #[arg(long)]
    pub out: PathBuf,
    /// Override the master seed from the configuration.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Cross-section table cache; built and saved when missing.
    #[arg(long)]
    pub xsec_cache: Option<PathBuf>,
}

pub fn run(args: &BurstArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let config = load_config(&args.config, args.seed)?;
    let flux = config.physics.load_flux()?;
    let xsec = config.load_cross_sections()?;

    let table = match &args.xsec_cache {
        Some(path) if path.exists() => {
            info!("loading cross-section cache {}", path.display());
            CrossSectionGrid::load_for(path, &config.grid, &selected_channels(&config))?
        }
        Some(path) => {
            let table = build_table(&config, &xsec)?;
            table.save(path)?;
            info!("saved cross-section cache {}", path.display());
            table
        }
        None => build_table(&config, &xsec)?,
    };

    let mut writer = SegmentedJsonWriter::new(
        &args.out,
        &config.output.prefix,
        config.output.events_per_file,
    );
    let summary = run_burst_with_table(&config, &flux, &xsec, &table, &mut writer)?;

    write_json(args.out.join(&config.output.summary_file), &summary)?;
    write_reports_csv(&args.out.join(&config.output.channels_file), &summary.channels)?;

    let mut manifest = RunManifest::new("burst", &config)?;
    manifest.outputs = writer.outputs().to_vec();
    manifest.events_written = writer.written();
    manifest.expected_total = Some(summary.expected_total);
    manifest.write(&args.out.join(&config.output.manifest_file))?;

    info!(
        "wrote {} events in {} segments to {}",
        writer.written(),
        writer.outputs().len(),
        args.out.display()
    );
    Ok(())
}
