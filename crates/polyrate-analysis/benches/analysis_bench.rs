//! Criterion benchmarks for polyrate-analysis components
//!
//! Run with: cargo bench -p polyrate-analysis
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use polyrate_analysis::{
    fft::{Fft, Window},
    measure_tone,
    quality::{sine, spectral_purity_db},
};

const SAMPLE_RATE: f64 = 48_000.0;

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("FFT");

    for &size in &[1024usize, 4096, 16_384] {
        let signal = sine(1000.0, SAMPLE_RATE, size, 0.5);
        let fft = Fft::new(size);
        group.bench_with_input(BenchmarkId::new("forward", size), &size, |b, _| {
            b.iter(|| black_box(fft.forward(black_box(&signal))));
        });
    }

    group.finish();
}

fn bench_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("Window");

    for window in [Window::Hann, Window::BlackmanHarris] {
        group.bench_function(format!("{window:?}"), |b| {
            let mut buffer = vec![1.0f32; 16_384];
            b.iter(|| window.apply(black_box(&mut buffer)));
        });
    }

    group.finish();
}

fn bench_quality(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quality");
    group.sample_size(10);

    let signal = sine(1000.0, SAMPLE_RATE, 16_384, 0.5);
    group.bench_function("spectral_purity_16k", |b| {
        b.iter(|| black_box(spectral_purity_db(black_box(&signal), 48_000.0, 1000.0)));
    });

    group.bench_function("measure_tone_44k1_48k", |b| {
        b.iter(|| black_box(measure_tone(44_100, 48_000, black_box(1000.0))));
    });

    group.finish();
}

criterion_group!(benches, bench_fft, bench_window, bench_quality);
criterion_main!(benches);
