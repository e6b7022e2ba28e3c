use gcool_core::errors::{ErrorInfo, VolError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("field", "error")
        .with_context("value", "-1")
}

#[test]
fn configuration_error_surface() {
    let err = VolError::InvalidConfiguration(sample_info("config-error", "error must lie in (0, 1)"));
    assert_eq!(err.info().code, "config-error");
    assert!(err.info().context.contains_key("field"));
}

#[test]
fn config_shorthand_names_the_field() {
    let err = VolError::config("W", "window must be at least 1");
    assert!(matches!(err, VolError::InvalidConfiguration(_)));
    assert_eq!(err.info().context.get("field").map(String::as_str), Some("W"));
}

#[test]
fn degenerate_region_surface() {
    let err = VolError::DegenerateRegion(sample_info("short-schedule", "schedule too short"));
    assert_eq!(err.info().code, "short-schedule");
}

#[test]
fn numeric_instability_surface() {
    let err = VolError::NumericInstability(sample_info("zero-window-max", "window max is zero"));
    assert_eq!(err.info().code, "zero-window-max");
}

#[test]
fn display_includes_context_and_hint() {
    let err = VolError::Collaborator(
        ErrorInfo::new("rounding-cholesky", "scatter matrix not positive definite")
            .with_context("pass", "1")
            .with_hint("increase rounding.samples"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("collaborator failure: "));
    assert!(rendered.contains("code: rounding-cholesky"));
    assert!(rendered.contains("pass=1"));
    assert!(rendered.contains("hint: increase rounding.samples"));
}

#[test]
fn errors_round_trip_json() {
    let err = VolError::Serde(sample_info("manifest-read", "missing file"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Serde\""));
    let decoded: VolError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
