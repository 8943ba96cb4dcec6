use snvec_core::errors::{ErrorInfo, SnError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("id", "1")
        .with_context("reason", "example")
}

#[test]
fn codec_error_surface() {
    let err = SnError::Codec(sample_info("unrecognized-channel", "bad id"));
    assert_eq!(err.info().code, "unrecognized-channel");
    assert!(err.info().context.contains_key("id"));
    assert!(err.is_recoverable());
}

#[test]
fn kinematics_error_is_recoverable() {
    let err = SnError::Kinematics(sample_info("no-valid-kinematics", "below threshold"));
    assert!(err.is_recoverable());
}

#[test]
fn envelope_error_is_fatal() {
    let err = SnError::Envelope(sample_info("envelope-too-low", "cap reached"));
    assert!(!err.is_recoverable());
    assert_eq!(err.info().code, "envelope-too-low");
}

#[test]
fn display_includes_context_and_hint() {
    let err = SnError::Config(sample_info("grid", "zero bins").with_hint("set time_bins"));
    let rendered = err.to_string();
    assert!(rendered.starts_with("config error: zero bins (code: grid)"));
    assert!(rendered.contains("id=1"));
    assert!(rendered.contains("hint: set time_bins"));
}

#[test]
fn errors_round_trip_through_json() {
    let err = SnError::Model(sample_info("table", "length mismatch"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Model\""));
    let back: SnError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, err);
}
