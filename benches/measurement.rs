use criterion::{black_box, criterion_group, criterion_main, Criterion};
use giftwrap_measure::geometry::{Candidate, Rect};
use giftwrap_measure::vision::{ImageprocBackend, VisionBackend};
use giftwrap_measure::{measure_candidates, MeasureConfig, Measurer};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect as PixelRect;

fn scene() -> RgbaImage {
    let mut image = RgbaImage::from_pixel(1280, 960, Rgba([60, 60, 60, 255]));
    draw_filled_rect_mut(
        &mut image,
        PixelRect::at(100, 100).of_size(891, 630),
        Rgba([240, 240, 240, 255]),
    );
    draw_filled_rect_mut(
        &mut image,
        PixelRect::at(300, 250).of_size(300, 150),
        Rgba([120, 90, 60, 255]),
    );
    image
}

fn benchmark_estimator(c: &mut Criterion) {
    let mut candidates: Vec<Candidate> = (0..200)
        .map(|i| {
            let offset = i as f64;
            Candidate::from_rect(Rect::axis(offset, offset, 20.0 + offset, 15.0 + offset))
        })
        .collect();
    candidates.push(Candidate::from_rect(Rect::axis(0.0, 0.0, 891.0, 630.0)));
    let config = MeasureConfig::a4_sheet();

    c.bench_function("measure_candidates_200", |b| {
        b.iter(|| measure_candidates(black_box(&candidates), &[], &config))
    });
}

fn benchmark_pipeline(c: &mut Criterion) {
    let image = scene();
    let backend = ImageprocBackend::default();
    let measurer = Measurer::new(MeasureConfig::a4_sheet()).unwrap();

    c.bench_function("imageproc_candidates_1280x960", |b| {
        b.iter(|| backend.candidates(black_box(&image)))
    });
    c.bench_function("measure_image_1280x960", |b| {
        b.iter(|| measurer.measure_image(black_box(&image)))
    });
}

criterion_group!(benches, benchmark_estimator, benchmark_pipeline);
criterion_main!(benches);
