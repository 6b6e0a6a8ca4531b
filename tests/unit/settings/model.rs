use super::*;

#[test]
fn defaults_match_authoring_presets() {
    let s = WatermarkSettings::default();
    assert_eq!(s.resize_mode, ResizeMode::Original);
    assert_eq!(s.resize_long_edge, 1920);
    assert_eq!(s.enhance_intensity(), 50);
    assert!(s.main.is_drawable());
    assert!(!s.sub.is_drawable());

    let link = s.sub.placement.link().copied().unwrap();
    assert_eq!(link.alignment, LinkAlignment::Left);
    assert_eq!(link.spacing, 10.0);
    assert_eq!(s.sub.placement.anchor().offset_y, 80.0);
    s.validate().unwrap();
}

#[test]
fn parses_camel_case_json_with_defaults() {
    let json = r##"
{
  "resizeMode": "fixed-long-edge",
  "resizeLongEdge": 1280,
  "autoEnhance": true,
  "main": { "text": "© studio", "position": "top-left", "offsetX": 5, "color": "#ff0000" },
  "sub": {
    "enabled": true,
    "text": "line two",
    "isLinkedToMain": true,
    "linkAlignment": "center",
    "linkSpacing": -4
  }
}
"##;
    let s = WatermarkSettings::from_json_str(json).unwrap();
    assert_eq!(s.resize_mode, ResizeMode::FixedLongEdge);
    assert_eq!(s.resize_long_edge, 1280);
    assert!(s.auto_enhance);
    assert_eq!(s.enhance_intensity(), 50);

    assert_eq!(s.main.text, "© studio");
    assert_eq!(s.main.font_size, 48.0);
    assert_eq!(
        s.main.placement,
        Placement::Absolute(AnchorPlacement {
            anchor: Anchor::TopLeft,
            offset_x: 5.0,
            offset_y: 20.0,
        })
    );

    let link = s.sub.placement.link().copied().unwrap();
    assert_eq!(link.alignment, LinkAlignment::Center);
    assert_eq!(link.spacing, -4.0);
}

#[test]
fn partial_sub_object_fills_in_from_sub_defaults() {
    let s = WatermarkSettings::from_json_str(r#"{ "sub": { "enabled": true, "text": "x" } }"#)
        .unwrap();
    let expected = LayerSettings {
        enabled: true,
        text: "x".to_string(),
        ..LayerSettings::default_sub()
    };
    assert_eq!(s.sub, expected);
    assert_eq!(s.sub.font_size, 24.0);
    assert_eq!(s.sub.placement.anchor().offset_y, 80.0);
    assert!(s.sub.placement.link().is_some());
    assert_eq!(s.main, LayerSettings::default());
}

#[test]
fn sub_can_opt_out_of_linking() {
    let s = WatermarkSettings::from_json_str(
        r#"{ "sub": { "isLinkedToMain": false, "position": "top-right" } }"#,
    )
    .unwrap();
    assert_eq!(
        s.sub.placement,
        Placement::Absolute(AnchorPlacement {
            anchor: Anchor::TopRight,
            offset_x: 20.0,
            offset_y: 80.0,
        })
    );
}

#[test]
fn absent_link_fields_take_layer_defaults() {
    // Sub: left alignment, 10px spacing.
    let s = WatermarkSettings::from_json_str(r#"{ "sub": { "linkAlignment": "right" } }"#).unwrap();
    let link = s.sub.placement.link().copied().unwrap();
    assert_eq!(link.alignment, LinkAlignment::Right);
    assert_eq!(link.spacing, 10.0);

    // Main has no link defaults; linking it explicitly gives left and zero.
    let s = WatermarkSettings::from_json_str(r#"{ "main": { "isLinkedToMain": true } }"#).unwrap();
    let link = s.main.placement.link().copied().unwrap();
    assert_eq!(link.alignment, LinkAlignment::Left);
    assert_eq!(link.spacing, 0.0);
}

#[test]
fn json_roundtrip_preserves_placement_variant() {
    let s = WatermarkSettings::default();
    let json = s.to_json_pretty().unwrap();
    assert!(json.contains("\"isLinkedToMain\": true"));
    assert!(json.contains("\"position\": \"bottom-right\""));
    let back = WatermarkSettings::from_json_str(&json).unwrap();
    assert_eq!(back, s);
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = WatermarkSettings::from_json_str("{ \"resizeMode\": \"stretch\" }").unwrap_err();
    assert!(matches!(err, WatermarkError::Serde(_)));
}

#[test]
fn validate_rejects_out_of_range_fields() {
    let mut s = WatermarkSettings::default();
    s.main.opacity = 1.5;
    assert!(s.validate().unwrap_err().to_string().contains("main.opacity"));

    let mut s = WatermarkSettings::default();
    s.sub.background.blur = 60.0;
    assert!(s.validate().unwrap_err().to_string().contains("sub.bgBlur"));

    let mut s = WatermarkSettings::default();
    s.main.font_size = 0.0;
    assert!(s.validate().is_err());

    let mut s = WatermarkSettings::default();
    s.enhance_intensity = Some(101);
    assert!(s.validate().is_err());
    assert_eq!(s.enhance_intensity(), 100);

    let mut s = WatermarkSettings::default();
    s.resize_mode = ResizeMode::FixedLongEdge;
    s.resize_long_edge = 0;
    assert!(s.validate().is_err());
}

#[test]
fn anchor_axes_decompose_grid() {
    assert_eq!(Anchor::TopLeft.horizontal(), AxisAnchor::Start);
    assert_eq!(Anchor::TopLeft.vertical(), AxisAnchor::Start);
    assert_eq!(Anchor::Center.horizontal(), AxisAnchor::Center);
    assert_eq!(Anchor::CenterRight.vertical(), AxisAnchor::Center);
    assert_eq!(Anchor::BottomCenter.horizontal(), AxisAnchor::Center);
    assert_eq!(Anchor::BottomRight.vertical(), AxisAnchor::End);
}

#[test]
fn empty_text_is_not_drawable() {
    let mut l = LayerSettings::default();
    l.text.clear();
    assert!(!l.is_drawable());
}
