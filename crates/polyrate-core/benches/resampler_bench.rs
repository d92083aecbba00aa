//! Criterion benchmarks for polyrate-core
//!
//! Run with: cargo bench -p polyrate-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use polyrate_core::{Dither, Resampler, Stride, design_irrational, design_rational};

const BLOCK_SIZES: &[usize] = &[64, 256, 1024, 4096];

/// (input rate, output rate) pairs covering both modes and directions.
const RATE_PAIRS: &[(u32, u32)] = &[
    (44_100, 48_000),
    (48_000, 44_100),
    (48_000, 16_000),
    (44_100, 44_101),
];

fn generate_test_signal(size: usize, sample_rate: f32) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / sample_rate;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_design(c: &mut Criterion) {
    let mut group = c.benchmark_group("Design");

    for &(from, to) in RATE_PAIRS {
        let stride = Stride::new(from, to);
        let (up, down) = (stride.up_factor() as usize, stride.down_factor() as usize);
        group.bench_function(BenchmarkId::from_parameter(format!("{from}->{to}")), |b| {
            b.iter(|| match stride.step() {
                None => {
                    black_box(design_rational(black_box(up), black_box(down), 1.0));
                }
                Some(_) => {
                    black_box(design_irrational(black_box(up), black_box(down), 1.0));
                }
            });
        });
    }

    group.finish();
}

fn bench_process_float(c: &mut Criterion) {
    let mut group = c.benchmark_group("ProcessFloat");

    for &(from, to) in RATE_PAIRS {
        for &block_size in BLOCK_SIZES {
            let input = generate_test_signal(block_size, from as f32);
            group.throughput(Throughput::Elements(block_size as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{from}->{to}"), block_size),
                &block_size,
                |b, _| {
                    let mut src = Resampler::new(from, to, 1);
                    let mut output = vec![0.0f32; src.max_output(block_size)];
                    b.iter(|| {
                        black_box(src.process_float(&[black_box(&input[..])], &mut [&mut output[..]]));
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_render_stereo(c: &mut Criterion) {
    let mut group = c.benchmark_group("RenderStereo");

    for &dither in &[Dither::None, Dither::Triangular] {
        let block_size = 1024;
        let mono = generate_test_signal(block_size, 44_100.0);
        let input: Vec<i16> = mono
            .iter()
            .flat_map(|&s| {
                let v = (s * 32767.0) as i16;
                [v, v]
            })
            .collect();

        group.throughput(Throughput::Elements(block_size as u64));
        group.bench_function(BenchmarkId::new("44100->48000", format!("{dither:?}")), |b| {
            let mut src = Resampler::new(44_100, 48_000, 2).with_dither(dither);
            let mut output = vec![0i16; 2 * src.max_output(block_size)];
            b.iter(|| {
                black_box(src.render(black_box(&input), &mut output));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_design, bench_process_float, bench_render_stereo);

criterion_main!(benches);
