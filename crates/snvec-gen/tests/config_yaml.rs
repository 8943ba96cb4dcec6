use std::fs;

use snvec_core::{ChannelFamily, CrossSectionModel, Flavor, ReactionChannel, SnError};
use snvec_gen::{DetectorVolume, FluxSource, RunConfig};
use snvec_physics::elastic;
use tempfile::tempdir;

#[test]
fn partial_document_fills_defaults() {
    let config = RunConfig::from_yaml_str(
        "distance_kpc: 5.0\n\
         grid:\n  energy_bins: 80\n\
         channels:\n  nc_oxygen: false\n\
         seed_policy:\n  master_seed: 42\n",
    )
    .unwrap();
    config.validate().unwrap();
    assert_eq!(config.grid.energy_bins, 80);
    assert_eq!(config.grid.time_bins, 1000);
    assert_eq!(config.grid.time_width, 0.01);
    assert!(!config.channels.nc_oxygen);
    assert!(config.channels.cc_oxygen);
    assert_eq!(config.seed_policy.master_seed, 42);
    assert_eq!(config.distance_scale(), 4.0);
    assert_eq!(config.direction, [0.0, 0.0, -1.0]);
    assert_eq!(config.volume.selection, DetectorVolume::InnerDetector);
    assert_eq!(config.physics.flux, FluxSource::Reference);
    assert_eq!(
        config.normalization.for_family(ChannelFamily::InverseBetaDecay),
        2.1746e33
    );
}

#[test]
fn volume_selector_and_custom_cylinder_parse() {
    let config =
        RunConfig::from_yaml_str("volume:\n  selection:\n    type: fiducial-volume\n").unwrap();
    let cylinder = config.volume.resolve();
    assert_eq!(cylinder.radius, 1490.0);
    assert_eq!(cylinder.half_height, 1610.0);

    let config = RunConfig::from_yaml_str(
        "volume:\n  selection:\n    type: custom\n    radius: 100.0\n    half_height: 50.0\n",
    )
    .unwrap();
    let cylinder = config.volume.resolve();
    assert_eq!((cylinder.radius, cylinder.half_height), (100.0, 50.0));
}

#[test]
fn invalid_values_are_config_errors() {
    for text in [
        "distance_kpc: 0.0\n",
        "direction: [0.0, 0.0, 0.0]\n",
        "grid:\n  time_bins: 0\n",
        "grid:\n  energy_width: -1.0\n",
        "kinematics:\n  max_iterations: 0\n",
        "output:\n  events_per_file: 0\n",
    ] {
        let config = RunConfig::from_yaml_str(text).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, SnError::Config(_)), "{text}: {err}");
    }
}

#[test]
fn unparsable_file_names_its_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.yaml");
    fs::write(&path, "grid: [1, 2\n").unwrap();
    let err = RunConfig::load(&path).unwrap_err();
    assert!(matches!(err, SnError::Serde(_)));
    assert_eq!(
        err.info().context.get("path").map(String::as_str),
        Some(path.display().to_string().as_str())
    );

    let missing = dir.path().join("missing.yaml");
    assert!(matches!(RunConfig::load(&missing), Err(SnError::Io(_))));
}

#[test]
fn loaded_file_round_trips_through_yaml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.yaml");
    let mut config = RunConfig::default();
    config.grid.time_bins = 20;
    config.generate_events = false;
    fs::write(&path, serde_yaml::to_string(&config).unwrap()).unwrap();
    assert_eq!(RunConfig::load(&path).unwrap(), config);
}

#[test]
fn cross_sections_follow_the_elastic_recoil_cut() {
    let config = RunConfig::from_yaml_str("kinematics:\n  elastic_min_total_energy: 5.0\n").unwrap();
    let xsec = config.load_cross_sections().unwrap();
    assert_eq!(xsec.elastic_min_total_energy(), 5.0);
    let channel = ReactionChannel::ElasticScattering {
        flavor: Flavor::ElectronNeutrino,
    };
    assert_eq!(
        xsec.total(&channel, 20.0),
        elastic::total_cross_section(Flavor::ElectronNeutrino, 20.0, 5.0)
    );

    let defaults = RunConfig::default().load_cross_sections().unwrap();
    assert_eq!(
        defaults.elastic_min_total_energy(),
        RunConfig::default().kinematics.elastic_min_total_energy
    );
}
