use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use snvec_core::constants::REFERENCE_DISTANCE_KPC;
use snvec_core::{
    io_error, ChannelFamily, ChannelSelection, ErrorInfo, MixingParameters, SnError, SpectrumModel,
    Vec3,
};
use snvec_physics::{
    OxygenCrossSections, OxygenTables, QuasiThermalFlux, StandardCrossSections, TabulatedSpectrum,
    ThermalSpectrum,
};

use crate::grid::EnergyTimeGrid;
use crate::sampler::{DetectorVolume, TankGeometry};

/// YAML-configurable parameters governing a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Time × energy integration grid.
    #[serde(default)]
    pub grid: EnergyTimeGrid,
    /// Flavor-mixing coefficients.
    #[serde(default)]
    pub mixing: MixingParameters,
    /// Target counts per channel family.
    #[serde(default)]
    pub normalization: Normalization,
    /// Source distance in kpc.
    #[serde(default = "default_distance")]
    pub distance_kpc: f64,
    /// Neutrino travel direction in detector coordinates.
    #[serde(default = "default_direction")]
    pub direction: Vec3,
    /// Volume in which vertices are placed.
    #[serde(default)]
    pub volume: VolumeConfig,
    /// Rejection sampler tuning.
    #[serde(default)]
    pub kinematics: KinematicsConfig,
    /// Channel families taking part in the run.
    #[serde(default)]
    pub channels: ChannelSelection,
    /// Whether discrete events are drawn, or only expected totals computed.
    #[serde(default = "default_generate_events")]
    pub generate_events: bool,
    /// Master seed and substream policy.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Output layout.
    #[serde(default)]
    pub output: OutputConfig,
    /// Physics inputs.
    #[serde(default)]
    pub physics: PhysicsConfig,
}

fn default_distance() -> f64 {
    REFERENCE_DISTANCE_KPC
}

fn default_direction() -> Vec3 {
    [0.0, 0.0, -1.0]
}

fn default_generate_events() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            grid: EnergyTimeGrid::default(),
            mixing: MixingParameters::default(),
            normalization: Normalization::default(),
            distance_kpc: default_distance(),
            direction: default_direction(),
            volume: VolumeConfig::default(),
            kinematics: KinematicsConfig::default(),
            channels: ChannelSelection::default(),
            generate_events: default_generate_events(),
            seed_policy: SeedPolicy::default(),
            output: OutputConfig::default(),
            physics: PhysicsConfig::default(),
        }
    }
}

impl RunConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, SnError> {
        serde_yaml::from_str(text)
            .map_err(|err| SnError::Serde(ErrorInfo::new("config-parse", err.to_string())))
    }

    /// Loads and validates a YAML file.
    pub fn load(path: &Path) -> Result<Self, SnError> {
        let text = std::fs::read_to_string(path).map_err(|err| io_error(path, err))?;
        let config = Self::from_yaml_str(&text).map_err(|err| {
            SnError::Serde(err.info().clone().with_context("path", path.display().to_string()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), SnError> {
        self.grid.validate()?;
        if !(self.distance_kpc > 0.0) || !self.distance_kpc.is_finite() {
            return Err(config_error("distance_kpc", self.distance_kpc.to_string()));
        }
        let length = snvec_core::event::norm(self.direction);
        if !(length > 0.0) || !length.is_finite() {
            return Err(SnError::Config(
                ErrorInfo::new("invalid-config", "direction must be a non-zero finite vector")
                    .with_context("field", "direction")
                    .with_context("value", format!("{:?}", self.direction)),
            ));
        }
        if self.kinematics.max_iterations == 0 {
            return Err(config_error("kinematics.max_iterations", "0".into()));
        }
        if self.kinematics.cos_bins == 0 {
            return Err(config_error("kinematics.cos_bins", "0".into()));
        }
        if self.output.events_per_file == 0 {
            return Err(config_error("output.events_per_file", "0".into()));
        }
        self.volume.resolve().validate()?;
        Ok(())
    }

    /// `(10 kpc / distance)²`.
    pub fn distance_scale(&self) -> f64 {
        let ratio = REFERENCE_DISTANCE_KPC / self.distance_kpc;
        ratio * ratio
    }

    /// Normalized travel direction.
    pub fn unit_direction(&self) -> Vec3 {
        let length = snvec_core::event::norm(self.direction);
        snvec_core::event::scale(self.direction, 1.0 / length)
    }

    /// Cross sections whose elastic totals count the same recoils the
    /// kinematics sampler draws.
    pub fn load_cross_sections(&self) -> Result<StandardCrossSections, SnError> {
        Ok(self
            .physics
            .load_cross_sections()?
            .with_elastic_min_total_energy(self.kinematics.elastic_min_total_energy))
    }
}

fn config_error(field: &str, value: String) -> SnError {
    SnError::Config(
        ErrorInfo::new("invalid-config", "configuration value out of range")
            .with_context("field", field)
            .with_context("value", value),
    )
}

/// Number of targets per channel family.
///
/// Defaults describe 32.5 kton of water.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    /// Free protons, for inverse beta decay.
    #[serde(default = "default_protons")]
    pub protons: f64,
    /// Electrons, for elastic scattering.
    #[serde(default = "default_electrons")]
    pub electrons: f64,
    /// Oxygen nuclei.
    #[serde(default = "default_oxygen")]
    pub oxygen: f64,
}

fn default_protons() -> f64 {
    2.1746e33
}

fn default_electrons() -> f64 {
    1.0873e34
}

fn default_oxygen() -> f64 {
    1.0873e33
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            protons: default_protons(),
            electrons: default_electrons(),
            oxygen: default_oxygen(),
        }
    }
}

impl Normalization {
    /// Target count for a channel family.
    pub fn for_family(&self, family: ChannelFamily) -> f64 {
        match family {
            ChannelFamily::InverseBetaDecay => self.protons,
            ChannelFamily::Elastic => self.electrons,
            ChannelFamily::ChargedCurrentOxygen | ChannelFamily::NeutralCurrentOxygen => {
                self.oxygen
            }
        }
    }
}

/// Vertex volume selection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Which volume to fill.
    #[serde(default)]
    pub selection: DetectorVolume,
    /// Tank dimensions.
    #[serde(default)]
    pub tank: TankGeometry,
}

impl VolumeConfig {
    /// Cylinder actually used for vertex placement.
    pub fn resolve(&self) -> crate::sampler::Cylinder {
        self.selection.cylinder(&self.tank)
    }
}

/// Rejection sampler tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicsConfig {
    /// Number of cosθ points scanned for the envelope.
    #[serde(default = "default_cos_bins")]
    pub cos_bins: usize,
    /// Attempts before the sampler reports an envelope failure.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Lowest recoil-electron total energy sampled in elastic scattering, MeV.
    #[serde(default = "default_elastic_min_total_energy")]
    pub elastic_min_total_energy: f64,
}

fn default_cos_bins() -> usize {
    1000
}

fn default_max_iterations() -> u32 {
    1_000_000
}

fn default_elastic_min_total_energy() -> f64 {
    snvec_physics::elastic::DEFAULT_MIN_TOTAL_ENERGY
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            cos_bins: default_cos_bins(),
            max_iterations: default_max_iterations(),
            elastic_min_total_energy: default_elastic_min_total_energy(),
        }
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed used for the run.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded in manifests.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x5EED_0000_1987_0223
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

/// Output layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File name prefix for event segments.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Events written per segment file.
    #[serde(default = "default_events_per_file")]
    pub events_per_file: usize,
    /// Summary filename relative to the output directory.
    #[serde(default = "default_summary_file")]
    pub summary_file: PathBuf,
    /// Per-channel CSV filename relative to the output directory.
    #[serde(default = "default_channels_file")]
    pub channels_file: PathBuf,
    /// Manifest filename relative to the output directory.
    #[serde(default = "default_manifest_file")]
    pub manifest_file: PathBuf,
}

fn default_prefix() -> String {
    "snvec".to_string()
}

fn default_events_per_file() -> usize {
    1000
}

fn default_summary_file() -> PathBuf {
    PathBuf::from("summary.json")
}

fn default_channels_file() -> PathBuf {
    PathBuf::from("channels.csv")
}

fn default_manifest_file() -> PathBuf {
    PathBuf::from("manifest.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            events_per_file: default_events_per_file(),
            summary_file: default_summary_file(),
            channels_file: default_channels_file(),
            manifest_file: default_manifest_file(),
        }
    }
}

/// Where the burst flux comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FluxSource {
    /// Built-in constant-luminosity burst.
    Reference,
    /// Tables given inline.
    Inline {
        /// Per-class time tables.
        tables: QuasiThermalFlux,
    },
    /// Tables read from a YAML file.
    File {
        /// Path to the YAML file.
        path: PathBuf,
    },
}

impl Default for FluxSource {
    fn default() -> Self {
        FluxSource::Reference
    }
}

/// Where the diffuse spectrum comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SpectrumSource {
    /// Quasi-thermal shape.
    Thermal(ThermalSpectrum),
    /// Tables given inline.
    Inline(TabulatedSpectrum),
    /// Two-column `energy flux` text file.
    File {
        /// Path to the table.
        path: PathBuf,
    },
}

impl Default for SpectrumSource {
    fn default() -> Self {
        SpectrumSource::Thermal(ThermalSpectrum {
            mean_energy: 15.0,
            pinch: 2.0,
            integrated_flux: 10.0,
        })
    }
}

/// Loaded diffuse spectrum.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedSpectrum {
    /// Quasi-thermal shape.
    Thermal(ThermalSpectrum),
    /// Tabulated spectrum.
    Table(TabulatedSpectrum),
}

impl SpectrumModel for LoadedSpectrum {
    fn flux(&self, energy: f64) -> f64 {
        match self {
            LoadedSpectrum::Thermal(spectrum) => spectrum.flux(energy),
            LoadedSpectrum::Table(spectrum) => spectrum.flux(energy),
        }
    }
}

/// Diffuse (steady-source) inverse beta decay generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffuseConfig {
    /// Spectrum of the source.
    #[serde(default)]
    pub spectrum: SpectrumSource,
    /// Lower edge of the sampled energy range in MeV.
    #[serde(default = "default_diffuse_energy_min")]
    pub energy_min: f64,
    /// Upper edge of the sampled energy range in MeV.
    #[serde(default = "default_diffuse_energy_max")]
    pub energy_max: f64,
    /// Lower edge of the positron cosθ range.
    #[serde(default = "default_cos_min")]
    pub cos_min: f64,
    /// Upper edge of the positron cosθ range.
    #[serde(default = "default_cos_max")]
    pub cos_max: f64,
    /// Points per axis scanned for the sampling ceiling.
    #[serde(default = "default_scan_bins")]
    pub scan_bins: usize,
    /// Draw flat in positron energy instead of following the spectrum.
    #[serde(default)]
    pub flat: bool,
    /// Attempts per event before reporting an envelope failure.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_diffuse_energy_min() -> f64 {
    10.0
}

fn default_diffuse_energy_max() -> f64 {
    80.0
}

fn default_cos_min() -> f64 {
    -1.0
}

fn default_cos_max() -> f64 {
    1.0
}

fn default_scan_bins() -> usize {
    200
}

impl Default for DiffuseConfig {
    fn default() -> Self {
        Self {
            spectrum: SpectrumSource::default(),
            energy_min: default_diffuse_energy_min(),
            energy_max: default_diffuse_energy_max(),
            cos_min: default_cos_min(),
            cos_max: default_cos_max(),
            scan_bins: default_scan_bins(),
            flat: false,
            max_iterations: default_max_iterations(),
        }
    }
}

impl DiffuseConfig {
    /// Checks the sampled ranges.
    pub fn validate(&self) -> Result<(), SnError> {
        if !(self.energy_max > self.energy_min) || self.energy_min < 0.0 {
            return Err(config_error(
                "physics.diffuse.energy_min/energy_max",
                format!("{}..{}", self.energy_min, self.energy_max),
            ));
        }
        if !(self.cos_max > self.cos_min) || self.cos_min < -1.0 || self.cos_max > 1.0 {
            return Err(config_error(
                "physics.diffuse.cos_min/cos_max",
                format!("{}..{}", self.cos_min, self.cos_max),
            ));
        }
        if self.scan_bins == 0 || self.max_iterations == 0 {
            return Err(config_error("physics.diffuse.scan_bins/max_iterations", "0".into()));
        }
        Ok(())
    }

    /// Loads the configured spectrum.
    pub fn load_spectrum(&self) -> Result<LoadedSpectrum, SnError> {
        match &self.spectrum {
            SpectrumSource::Thermal(thermal) => Ok(LoadedSpectrum::Thermal(*thermal)),
            SpectrumSource::Inline(table) => {
                table.validate()?;
                Ok(LoadedSpectrum::Table(table.clone()))
            }
            SpectrumSource::File { path } => {
                TabulatedSpectrum::load_columns(path).map(LoadedSpectrum::Table)
            }
        }
    }
}

/// Physics inputs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Burst flux.
    #[serde(default)]
    pub flux: FluxSource,
    /// Oxygen cross-section tables; oxygen channels vanish without them.
    #[serde(default)]
    pub oxygen_tables: Option<PathBuf>,
    /// Diffuse generation settings.
    #[serde(default)]
    pub diffuse: DiffuseConfig,
}

impl PhysicsConfig {
    /// Loads and validates the burst flux.
    pub fn load_flux(&self) -> Result<QuasiThermalFlux, SnError> {
        match &self.flux {
            FluxSource::Reference => Ok(QuasiThermalFlux::reference_burst()),
            FluxSource::Inline { tables } => {
                tables.validate()?;
                Ok(tables.clone())
            }
            FluxSource::File { path } => QuasiThermalFlux::load(path),
        }
    }

    /// Builds the standard cross sections, reading oxygen tables when configured.
    pub fn load_cross_sections(&self) -> Result<StandardCrossSections, SnError> {
        let oxygen = match &self.oxygen_tables {
            Some(path) => Some(OxygenCrossSections::from_tables(OxygenTables::load(path)?)?),
            None => None,
        };
        Ok(StandardCrossSections::new(oxygen))
    }
}
