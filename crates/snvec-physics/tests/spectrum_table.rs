use std::io::Write;

use snvec_core::{SnError, SpectrumModel};
use snvec_physics::TabulatedSpectrum;

#[test]
fn reads_columns_and_interpolates() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# energy flux").unwrap();
    writeln!(file, "10 1.0").unwrap();
    writeln!(file, "20 0.25   # steep").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "40 0.0625").unwrap();
    let spectrum = TabulatedSpectrum::load_columns(file.path()).unwrap();
    assert_eq!(spectrum.energies, vec![10.0, 20.0, 40.0]);
    assert!((spectrum.flux(10.0 * 2f64.sqrt()) - 0.5).abs() < 1e-9);
    assert_eq!(spectrum.flux(5.0), 0.0);
}

#[test]
fn malformed_lines_are_reported() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "10 1.0").unwrap();
    writeln!(file, "twenty 0.5").unwrap();
    let err = TabulatedSpectrum::load_columns(file.path()).unwrap_err();
    assert!(matches!(err, SnError::Serde(info) if info.context.get("line").map(String::as_str) == Some("2")));
}
