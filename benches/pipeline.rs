//! Benchmarks for the per-frame pipeline.
//!
//! Run with: cargo bench

use chroma_track::capture::{FrameSource, SyntheticSource, TrackerConfig};
use chroma_track::clustering::{Clusterer, KMeans};
use chroma_track::color::ColorSpace;
use chroma_track::Pipeline;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_static_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("static_range");

    for &(width, height) in &[(160u32, 120u32), (640, 480)] {
        let frame = SyntheticSource::new(width, height, 1)
            .next_frame()
            .expect("synthetic frame");
        group.throughput(Throughput::Elements((width * height) as u64));

        for space in [ColorSpace::Bgr, ColorSpace::Hsv] {
            let pipeline = Pipeline::new(TrackerConfig::new(space, false));
            group.bench_with_input(
                BenchmarkId::new(space.to_string(), format!("{width}x{height}")),
                &frame,
                |b, frame| b.iter(|| pipeline.process(black_box(frame))),
            );
        }
    }

    group.finish();
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");
    group.sample_size(10);

    let frame = SyntheticSource::new(160, 120, 1)
        .next_frame()
        .expect("synthetic frame");
    let pixels: Vec<_> = frame.pixels().collect();
    group.throughput(Throughput::Elements(pixels.len() as u64));

    for k in [3usize, 10] {
        let kmeans = KMeans::new(k);
        group.bench_with_input(BenchmarkId::from_parameter(k), &pixels, |b, pixels| {
            b.iter(|| kmeans.cluster(black_box(pixels)))
        });
    }

    group.finish();
}

fn bench_adaptive_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("adaptive_range");
    group.sample_size(10);

    let frame = SyntheticSource::new(160, 120, 1)
        .next_frame()
        .expect("synthetic frame");
    let pipeline = Pipeline::new(TrackerConfig::new(ColorSpace::Hsv, true));

    group.bench_function("hsv_160x120", |b| b.iter(|| pipeline.process(black_box(&frame))));
    group.finish();
}

criterion_group!(benches, bench_static_pipeline, bench_kmeans, bench_adaptive_pipeline);
criterion_main!(benches);
