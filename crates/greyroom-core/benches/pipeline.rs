//! Benchmarks for the Greyroom store and filter.
//!
//! Run with: cargo bench -p greyroom-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use greyroom_core::{ChannelLayout, DecodedImage, Grayscale, ImageRecord, ImageStore};

fn rgba_record(name: &str, width: u32, height: u32) -> ImageRecord {
    let pixels = (0..width * height * 4).map(|i| (i % 251) as u8).collect();
    ImageRecord::new(
        name.into(),
        DecodedImage {
            width,
            height,
            layout: ChannelLayout::Rgba,
            pixels,
        },
    )
    .unwrap()
}

fn benchmark_grayscale_full(c: &mut Criterion) {
    let mut record = rgba_record("bench.png", 1920, 1080);
    let filter = Grayscale::new(100.0);

    c.bench_function("grayscale_1080p_rgba_full", |b| {
        b.iter(|| filter.apply(black_box(&mut record)))
    });
}

fn benchmark_grayscale_blend(c: &mut Criterion) {
    let mut pixels: Vec<u8> = (0..1920 * 1080 * 3).map(|i| (i % 253) as u8).collect();
    let filter = Grayscale::new(35.0);

    c.bench_function("grayscale_1080p_rgb_blend", |b| {
        b.iter(|| filter.apply_to_buffer(black_box(&mut pixels), ChannelLayout::Rgb))
    });
}

fn benchmark_select_target(c: &mut Criterion) {
    let mut store = ImageStore::new();
    for i in 0..1000 {
        store.insert(rgba_record(&format!("img_{i:04}.png"), 4, 4));
    }

    c.bench_function("select_last_of_1000", |b| {
        b.iter(|| store.select(black_box(Some("IMG_0999.PNG"))))
    });
}

criterion_group!(
    benches,
    benchmark_grayscale_full,
    benchmark_grayscale_blend,
    benchmark_select_target,
);
criterion_main!(benches);
