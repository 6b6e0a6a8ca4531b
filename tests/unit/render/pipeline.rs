use super::*;
use crate::settings::model::ResizeMode;

fn plain_settings() -> WatermarkSettings {
    let mut s = WatermarkSettings::default();
    s.main.enabled = false;
    s.sub.enabled = false;
    s
}

fn gray(w: u32, h: u32) -> SourceImage {
    SourceImage::from_rgba8(w, h, [90, 90, 90, 255].repeat((w * h) as usize)).unwrap()
}

#[test]
fn output_names_use_stem_and_jpg_extension() {
    assert_eq!(output_file_name("IMG_0001.PNG"), "watermarked_IMG_0001.jpg");
    assert_eq!(output_file_name("dir/photo.final.jpeg"), "watermarked_photo.final.jpg");
    assert_eq!(output_file_name("noext"), "watermarked_noext.jpg");
    assert_eq!(output_file_name(""), "watermarked_image.jpg");
}

#[test]
fn default_options_encode_at_quality_90() {
    let opts = RenderOptions::default();
    assert_eq!(opts.jpeg_quality, 90);
    assert!(opts.extra_fonts.is_empty());
}

#[test]
fn zero_threads_is_rejected() {
    assert!(build_thread_pool(Some(0)).is_err());
    assert!(build_thread_pool(Some(1)).is_ok());
}

#[test]
fn renderer_applies_resize_policy() {
    let mut renderer = Renderer::new(RenderOptions::default()).unwrap();
    let mut settings = plain_settings();
    settings.resize_mode = ResizeMode::FixedLongEdge;
    settings.resize_long_edge = 40;

    let (raster, report) = renderer
        .render_raster(&gray(8, 4), &settings, 80, 40)
        .unwrap();
    assert_eq!((raster.width, raster.height), (40, 20));
    assert_eq!(report.scale.get(), 0.04);
    assert!(report.main.is_none() && report.sub.is_none());
}

#[test]
fn batch_keeps_input_order_and_skips_invalid_dimensions() {
    let mut bad = plain_settings();
    bad.resize_mode = ResizeMode::Manual;
    bad.resize_width = Some(0);
    let mut jobs = vec![
        RenderJob::new("a.png", gray(6, 4), plain_settings()),
        RenderJob::new("b.png", gray(6, 4), bad),
        RenderJob::new("c.png", gray(3, 9), plain_settings()),
    ];
    // A zero native axis cannot be rescued by the manual fallback.
    jobs[1].native_width = 0;

    for parallel in [false, true] {
        let threading = BatchThreading {
            parallel,
            threads: Some(2),
        };
        let items = render_batch(&jobs, &RenderOptions::default(), &threading).unwrap();
        let names: Vec<_> = items.iter().map(|i| i.output_name.as_str()).collect();
        assert_eq!(
            names,
            ["watermarked_a.jpg", "watermarked_b.jpg", "watermarked_c.jpg"]
        );

        assert_eq!(items[0].result.as_ref().unwrap().image.width, 6);
        let err = items[1].result.as_ref().unwrap_err();
        assert!(err.is_skippable(), "{err}");
        assert_eq!(items[2].result.as_ref().unwrap().image.height, 9);
    }
}
