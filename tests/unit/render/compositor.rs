use super::*;
use crate::foundation::core::Point;
use crate::render::record::{RecordingSurface, SurfaceOp};
use crate::settings::model::{Anchor, AnchorPlacement, Placement};

fn source() -> SourceImage {
    SourceImage::from_rgba8(4, 2, vec![255; 4 * 2 * 4]).unwrap()
}

fn settings() -> WatermarkSettings {
    let mut s = WatermarkSettings::default();
    s.main.text = "abcd".to_string();
    s.main.font_size = 40.0;
    s.sub.enabled = true;
    s.sub.text = "xy".to_string();
    s.sub.font_size = 20.0;
    s
}

fn text_origins(ops: &[SurfaceOp]) -> Vec<(String, Point)> {
    ops.iter()
        .filter_map(|op| match op {
            SurfaceOp::FillText { text, origin, .. } => Some((text.clone(), *origin)),
            _ => None,
        })
        .collect()
}

#[test]
fn draws_base_image_before_layers_in_fixed_order() {
    let mut surface = RecordingSurface::new(Canvas::new(1000, 500));
    let mut s = settings();
    s.main.background.enabled = true;

    composite_onto(&mut surface, &source(), &s).unwrap();

    let ops = surface.ops();
    assert_eq!(ops.len(), 6, "{ops:?}");
    assert_eq!(ops[0], SurfaceOp::SetFilter(None));
    assert_eq!(
        ops[1],
        SurfaceOp::DrawImage {
            width: 4,
            height: 2
        }
    );
    assert_eq!(ops[2], SurfaceOp::SetFilter(None));
    assert!(matches!(ops[3], SurfaceOp::FillRect { .. }));
    assert!(matches!(&ops[4], SurfaceOp::FillText { text, .. } if text == "abcd"));
    assert!(matches!(&ops[5], SurfaceOp::FillText { text, .. } if text == "xy"));
}

#[test]
fn enhance_filter_wraps_only_the_base_image() {
    let mut surface = RecordingSurface::new(Canvas::new(1000, 500));
    let mut s = settings();
    s.auto_enhance = true;
    s.enhance_intensity = Some(100);

    composite_onto(&mut surface, &source(), &s).unwrap();

    let ops = surface.ops();
    assert_eq!(
        ops[0],
        SurfaceOp::SetFilter(Some(EnhanceFilter::from_intensity(100)))
    );
    assert_eq!(ops[2], SurfaceOp::SetFilter(None));
}

#[test]
fn anchors_main_and_links_sub_below_it() {
    let mut surface = RecordingSurface::new(Canvas::new(1000, 500));

    let report = composite_onto(&mut surface, &source(), &settings()).unwrap();

    // main: 80x24 at bottom-right, inset 20; sub: 20x12, left-aligned 10 below main.
    assert_eq!(
        text_origins(surface.ops()),
        vec![
            ("abcd".to_string(), Point::new(900.0, 456.0)),
            ("xy".to_string(), Point::new(900.0, 490.0)),
        ]
    );
    let main = report.main.unwrap();
    assert_eq!(main.bbox, LayerBox::new(900.0, 456.0, 80.0, 24.0));
    assert_eq!(main.font_size, 40.0);
    assert_eq!(report.sub.unwrap().bbox.y, 490.0);
    assert_eq!(report.scale.get(), 1.0);
}

#[test]
fn linked_sub_uses_its_own_anchor_when_main_is_skipped() {
    let mut surface = RecordingSurface::new(Canvas::new(1000, 500));
    let mut s = settings();
    s.main.enabled = false;

    let report = composite_onto(&mut surface, &source(), &s).unwrap();

    assert!(report.main.is_none());
    // fallback anchor: bottom-right, offsets (20, 80)
    assert_eq!(
        text_origins(surface.ops()),
        vec![("xy".to_string(), Point::new(960.0, 408.0))]
    );
}

#[test]
fn disabled_and_empty_layers_emit_no_draw_calls() {
    let mut s = settings();
    s.main.background.enabled = true;
    s.main.text = String::new();
    s.sub.enabled = false;
    s.sub.background.enabled = true;

    let mut surface = RecordingSurface::new(Canvas::new(1000, 500));
    let report = composite_onto(&mut surface, &source(), &s).unwrap();

    assert_eq!(surface.ops().len(), 3);
    assert!(report.main.is_none());
    assert!(report.sub.is_none());
}

#[test]
fn absolute_sub_ignores_main() {
    let mut s = settings();
    s.sub.placement = Placement::Absolute(AnchorPlacement {
        anchor: Anchor::TopLeft,
        offset_x: 5.0,
        offset_y: 5.0,
    });

    let mut surface = RecordingSurface::new(Canvas::new(2000, 1000));
    composite_onto(&mut surface, &source(), &s).unwrap();

    let origins = text_origins(surface.ops());
    assert_eq!(origins[1], ("xy".to_string(), Point::new(10.0, 10.0)));
}

#[test]
fn text_carries_scaled_shadow() {
    let mut surface = RecordingSurface::new(Canvas::new(2000, 1000));
    composite_onto(&mut surface, &source(), &settings()).unwrap();

    let shadow = surface
        .ops()
        .iter()
        .find_map(|op| match op {
            SurfaceOp::FillText { shadow, .. } => *shadow,
            _ => None,
        })
        .unwrap();
    assert_eq!(shadow.blur, 8.0);
    assert_eq!((shadow.offset_x, shadow.offset_y), (4.0, 4.0));
}

#[test]
fn compositing_is_deterministic() {
    let run = || {
        let mut surface = RecordingSurface::new(Canvas::new(1234, 567));
        let report = composite_onto(&mut surface, &source(), &settings()).unwrap();
        (surface.into_ops(), report)
    };
    assert_eq!(run(), run());
}
