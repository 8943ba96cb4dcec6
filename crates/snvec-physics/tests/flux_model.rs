use std::io::Write;

use snvec_core::{Flavor, FluxModel, SnError};
use snvec_physics::flux::spectral_shape;
use snvec_physics::{FluxTable, QuasiThermalFlux};

#[test]
fn spectral_shape_is_normalized_with_requested_mean() {
    let (mean, alpha) = (14.0, 2.5);
    let width = 0.01;
    let mut norm = 0.0;
    let mut first_moment = 0.0;
    for i in 0..20_000 {
        let energy = (i as f64 + 0.5) * width;
        let f = spectral_shape(energy, mean, alpha);
        norm += f * width;
        first_moment += energy * f * width;
    }
    assert!((norm - 1.0).abs() < 1e-4, "norm {norm}");
    assert!((first_moment - mean).abs() < 1e-2, "mean {first_moment}");
}

#[test]
fn flux_vanishes_outside_time_table() {
    let flux = QuasiThermalFlux::reference_burst();
    assert!(flux.flux(1.0, 15.0, Flavor::ElectronAntineutrino) > 0.0);
    assert_eq!(flux.flux(-0.1, 15.0, Flavor::ElectronAntineutrino), 0.0);
    assert_eq!(flux.flux(10.5, 15.0, Flavor::ElectronAntineutrino), 0.0);
    assert_eq!(
        flux.flux(1.0, 15.0, Flavor::HeavyAntineutrino),
        flux.flux(1.0, 15.0, Flavor::HeavyNeutrino)
    );
}

#[test]
fn validation_rejects_ragged_tables() {
    let mut flux = QuasiThermalFlux::reference_burst();
    flux.nux = FluxTable {
        time: vec![0.0, 1.0],
        luminosity: vec![1e52],
        mean_energy: vec![10.0, 10.0],
        pinch: vec![3.0, 3.0],
    };
    let err = flux.validate().unwrap_err();
    assert!(matches!(err, SnError::Model(info) if info.context.get("flavor").map(String::as_str) == Some("nux")));
}

#[test]
fn loads_yaml_description() {
    let yaml = serde_yaml::to_string(&QuasiThermalFlux::reference_burst()).unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    let loaded = QuasiThermalFlux::load(file.path()).unwrap();
    assert_eq!(loaded, QuasiThermalFlux::reference_burst());
}
