use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use snvec_core::{ErrorInfo, SnError};

use crate::config::RunConfig;
use crate::determinism::DerivedSeeds;

/// Provenance record written next to the generated events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Version of the generator crate.
    pub generator_version: String,
    /// Subcommand that produced the output.
    pub mode: String,
    /// SHA-256 of the canonical JSON form of the configuration.
    pub config_hash: String,
    /// Configuration used for the run.
    pub config: RunConfig,
    /// Master seed.
    pub master_seed: u64,
    /// Optional seed label from the configuration.
    pub seed_label: Option<String>,
    /// Substream seeds derived from the master seed.
    pub seeds: DerivedSeeds,
    /// UTC creation time, RFC 3339.
    pub created_at: String,
    /// Files written, relative to the output directory.
    pub outputs: Vec<PathBuf>,
    /// Events handed to the output layer.
    pub events_written: u64,
    /// Expected event total, where the mode computes one.
    pub expected_total: Option<f64>,
}

impl RunManifest {
    /// Manifest for `config` stamped with the current time.
    pub fn new(mode: &str, config: &RunConfig) -> Result<Self, SnError> {
        let master_seed = config.seed_policy.master_seed;
        Ok(Self {
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            mode: mode.to_string(),
            config_hash: config_hash(config)?,
            config: config.clone(),
            master_seed,
            seed_label: config.seed_policy.label.clone(),
            seeds: DerivedSeeds::for_master(master_seed),
            created_at: Utc::now().to_rfc3339(),
            outputs: Vec::new(),
            events_written: 0,
            expected_total: None,
        })
    }

    /// Writes the manifest to a JSON file.
    pub fn write(&self, path: &Path) -> Result<(), SnError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                SnError::Io(
                    ErrorInfo::new("manifest-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            SnError::Serde(
                ErrorInfo::new("manifest-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            SnError::Io(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, SnError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            SnError::Io(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            SnError::Serde(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

/// Hex SHA-256 of the configuration's JSON serialization.
pub fn config_hash(config: &RunConfig) -> Result<String, SnError> {
    let json = serde_json::to_vec(config)
        .map_err(|err| SnError::Serde(ErrorInfo::new("config-hash", err.to_string())))?;
    Ok(hex::encode(Sha256::digest(&json)))
}
