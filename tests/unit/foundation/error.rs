use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WatermarkError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        WatermarkError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        WatermarkError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        WatermarkError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn invalid_dimension_reports_both_axes() {
    let err = WatermarkError::invalid_dimension(0, 480);
    assert_eq!(err.to_string(), "invalid output dimension: 0x480");
    assert!(err.is_skippable());
    assert!(!WatermarkError::render("x").is_skippable());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WatermarkError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
