use dcc_lib::error::ErrorCategory;
use dcc_lib::DccError;

#[test]
fn config_error_display_includes_message() {
    let err = DccError::Config("missing viewport".to_string());

    assert_eq!(format!("{}", err), "Configuration error: missing viewport");
}

#[test]
fn io_error_display_wraps_source() {
    let io_err = std::io::Error::other("disk full");
    let err: DccError = io_err.into();
    let rendered = format!("{}", err);

    assert!(rendered.starts_with("IO error: "));
    assert!(rendered.contains("disk full"));
}

#[test]
fn figma_api_helper_includes_status_and_message() {
    let err = DccError::figma_api(Some(reqwest::StatusCode::NOT_FOUND), "not found");

    assert_eq!(
        format!("{}", err),
        "Figma API error (status: Some(404)): not found"
    );
}

#[test]
fn data_shape_helper_names_the_node() {
    let err = DccError::data_shape("design node 1:1 (Button)", "width is NaN");

    assert_eq!(
        format!("{}", err),
        "Malformed data for design node 1:1 (Button): width is NaN"
    );
    assert_eq!(err.to_payload().category, ErrorCategory::Data);
}

#[test]
fn report_and_capture_helpers_map_to_their_categories() {
    let report = DccError::report_build("rename failed");
    assert_eq!(format!("{}", report), "Report build error: rename failed");
    assert_eq!(report.to_payload().category, ErrorCategory::Report);

    let capture = DccError::capture("Playwright timed out after 45s capturing Desktop");
    let payload = capture.to_payload();
    assert_eq!(payload.category, ErrorCategory::Capture);
    assert!(payload
        .remediation
        .as_deref()
        .is_some_and(|hint| hint.contains("--process-timeout")));
}
