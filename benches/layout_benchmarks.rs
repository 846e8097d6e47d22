//! Benchmarks for layout planning, cue rendering, and page composition.
//!
//! Run with: cargo bench
//! Run with all features: cargo bench --all-features

use criterion::Criterion;
use image::{DynamicImage, Rgb, RgbImage};
use stream_thumbs::{
    CropWindow, FormatSpec, ImageBackend, PreviewOptions, plan_formats, plan_layout, render_page,
    render_pages, vtt,
};

fn synthetic_frames(count: u32, width: u32, height: u32) -> Vec<DynamicImage> {
    (0..count)
        .map(|i| {
            let shade = (i * 37 % 256) as u8;
            DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([shade, 64, 255 - shade])))
        })
        .collect()
}

fn benchmark_layout(criterion: &mut Criterion) {
    let options = PreviewOptions::new();

    criterion.bench_function("plan default formats (2h stream)", |bencher| {
        bencher.iter(|| {
            let _plans = plan_formats(7200.0, &options).unwrap();
        });
    });

    let plan = plan_layout(7200.0, &options, &FormatSpec::new(144, 120)).unwrap();
    criterion.bench_function("placement for every frame", |bencher| {
        bencher.iter(|| {
            for index in 0..plan.frame_count {
                let _placement = plan.placement(index);
            }
        });
    });
}

fn benchmark_vtt(criterion: &mut Criterion) {
    let format = FormatSpec::new(320, 180).with_prefix("@2x");
    let options = PreviewOptions::new().with_seconds_per_frame(1.0);
    let plan = plan_layout(3600.0, &options, &format).unwrap();

    criterion.bench_function("render 3600 VTT cues", |bencher| {
        bencher.iter(|| {
            let cues = vtt::build_cues(&plan, &format, "bench");
            let _text = vtt::render_vtt_text(&cues);
        });
    });
}

fn benchmark_composition(criterion: &mut Criterion) {
    let format = FormatSpec::new(160, 90);
    let options = PreviewOptions::new()
        .with_seconds_per_frame(2.0)
        .with_max_square(800);
    let plan = plan_layout(200.0, &options, &format).unwrap();
    let frames = synthetic_frames(plan.frame_count, 640, 360);
    let crop = CropWindow::for_frame(&frames[0], &plan).unwrap();
    let backend = ImageBackend::new();

    let mut group = criterion.benchmark_group("composition");
    group.sample_size(10);

    group.bench_function("render one full page", |bencher| {
        bencher.iter(|| {
            let _page =
                render_page(&backend, &plan, &format, "bench", &frames, 0, crop, 40).unwrap();
        });
    });

    group.bench_function("render all pages", |bencher| {
        bencher.iter(|| {
            let _pages = render_pages(&backend, &plan, &format, "bench", &frames, &options).unwrap();
        });
    });

    group.finish();
}

criterion::criterion_group!(benches, benchmark_layout, benchmark_vtt, benchmark_composition);
criterion::criterion_main!(benches);
