use super::*;
use crate::render::surface::GradientStop;

fn px(raster: &RasterImage, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * raster.width + x) * 4) as usize;
    [
        raster.data[i],
        raster.data[i + 1],
        raster.data[i + 2],
        raster.data[i + 3],
    ]
}

fn solid_image(w: u32, h: u32, rgba: [u8; 4]) -> SourceImage {
    SourceImage::from_rgba8(w, h, rgba.repeat((w * h) as usize)).unwrap()
}

fn close(a: u8, b: u8, tol: u8) -> bool {
    a.abs_diff(b) <= tol
}

#[test]
fn new_rejects_oversized_and_empty_canvases() {
    let mut fonts = FontBook::new();
    assert!(CpuSurface::new(&mut fonts, Canvas::new(70_000, 10)).is_err());
    let err = CpuSurface::new(&mut fonts, Canvas::new(0, 10))
        .err()
        .unwrap();
    assert!(err.is_skippable());
}

#[test]
fn surface_starts_transparent() {
    let mut fonts = FontBook::new();
    let surface = CpuSurface::new(&mut fonts, Canvas::new(3, 2)).unwrap();
    let raster = surface.into_raster();
    assert!(raster.premultiplied);
    assert_eq!(raster.data, vec![0u8; 3 * 2 * 4]);
}

#[test]
fn draw_image_stretches_to_canvas() {
    let mut fonts = FontBook::new();
    let mut surface = CpuSurface::new(&mut fonts, Canvas::new(8, 4)).unwrap();
    surface
        .draw_image(&solid_image(2, 1, [10, 200, 30, 255]))
        .unwrap();
    let raster = surface.into_raster();
    assert_eq!(px(&raster, 0, 0), [10, 200, 30, 255]);
    assert_eq!(px(&raster, 7, 3), [10, 200, 30, 255]);
}

#[test]
fn enhance_filter_applies_to_image_only_while_set() {
    let mut fonts = FontBook::new();
    let mut surface = CpuSurface::new(&mut fonts, Canvas::new(2, 2)).unwrap();
    surface.set_filter(Some(EnhanceFilter::from_intensity(100)));
    surface
        .draw_image(&solid_image(2, 2, [128, 128, 128, 255]))
        .unwrap();
    surface.set_filter(None);
    let raster = surface.into_raster();
    assert_eq!(px(&raster, 1, 1), [141, 141, 141, 255]);
}

#[test]
fn solid_rect_blends_over_image() {
    let mut fonts = FontBook::new();
    let mut surface = CpuSurface::new(&mut fonts, Canvas::new(10, 10)).unwrap();
    surface
        .draw_image(&solid_image(1, 1, [0, 0, 0, 255]))
        .unwrap();
    surface
        .fill_rect(
            Rect::new(2.0, 2.0, 8.0, 8.0),
            &Paint::Solid(Rgba8::new(255, 255, 255, 128)),
            None,
        )
        .unwrap();
    let raster = surface.into_raster();

    let inside = px(&raster, 5, 5);
    assert!(close(inside[0], 128, 2), "{inside:?}");
    assert_eq!(inside[3], 255);
    assert_eq!(px(&raster, 0, 0), [0, 0, 0, 255]);
}

#[test]
fn gradient_rect_fades_at_horizontal_edges_only() {
    let mut fonts = FontBook::new();
    let mut surface = CpuSurface::new(&mut fonts, Canvas::new(100, 10)).unwrap();
    surface
        .draw_image(&solid_image(1, 1, [255, 255, 255, 255]))
        .unwrap();
    let black = Rgba8::new(0, 0, 0, 255);
    let stops = vec![
        GradientStop {
            offset: 0.0,
            color: Rgba8::TRANSPARENT,
        },
        GradientStop {
            offset: 0.2,
            color: black,
        },
        GradientStop {
            offset: 0.8,
            color: black,
        },
        GradientStop {
            offset: 1.0,
            color: Rgba8::TRANSPARENT,
        },
    ];
    surface
        .fill_rect(
            Rect::new(0.0, 0.0, 100.0, 10.0),
            &Paint::HorizontalGradient {
                x0: 0.0,
                x1: 100.0,
                stops,
            },
            None,
        )
        .unwrap();
    let raster = surface.into_raster();

    assert!(px(&raster, 50, 5)[0] <= 2);
    assert!(px(&raster, 0, 5)[0] > 200);
    assert!(px(&raster, 99, 5)[0] > 200);
    assert_eq!(px(&raster, 50, 0), px(&raster, 50, 9));
}

#[test]
fn rect_shadow_falls_outside_shape_at_offset() {
    let mut fonts = FontBook::new();
    let mut surface = CpuSurface::new(&mut fonts, Canvas::new(40, 40)).unwrap();
    let shadow = Shadow {
        color: Rgba8::new(0, 0, 0, 128),
        blur: 0.0,
        offset_x: 5.0,
        offset_y: 5.0,
    };
    surface
        .fill_rect(
            Rect::new(10.0, 10.0, 20.0, 20.0),
            &Paint::Solid(Rgba8::new(255, 0, 0, 255)),
            Some(&shadow),
        )
        .unwrap();
    let raster = surface.into_raster();

    assert_eq!(px(&raster, 15, 15), [255, 0, 0, 255]);
    assert_eq!(px(&raster, 22, 22), [0, 0, 0, 128]);
    assert_eq!(px(&raster, 30, 30), [0, 0, 0, 0]);
}

#[test]
fn empty_text_is_a_no_op() {
    let mut fonts = FontBook::new();
    let mut surface = CpuSurface::new(&mut fonts, Canvas::new(4, 4)).unwrap();
    surface
        .fill_text(
            "",
            Point::new(0.0, 0.0),
            &FontSpec::new(12.0, "sans-serif"),
            Rgba8::new(255, 255, 255, 255),
            None,
        )
        .unwrap();
    assert_eq!(surface.into_raster().data, vec![0u8; 4 * 4 * 4]);
}
