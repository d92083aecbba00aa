//! Property-based tests for polyrate-core.
//!
//! Tests rate-query consistency, block-size invariance and DC transparency
//! using proptest for randomized rates and chunkings.

use proptest::prelude::*;
use polyrate_core::{Resampler, Stride};

/// Audio-range sample rates.
fn audio_rate() -> impl Strategy<Value = u32> {
    prop_oneof![
        prop::sample::select(vec![8_000u32, 11_025, 16_000, 22_050, 32_000, 44_100, 48_000, 88_200, 96_000]),
        8_000u32..=96_000,
    ]
}

/// Run `input` through `src` split at the given chunk sizes (cycled).
fn process_chunked(src: &mut Resampler, input: &[f32], chunks: &[usize]) -> Vec<f32> {
    let mut output = Vec::new();
    let mut pos = 0;
    for &size in chunks.iter().cycle() {
        if pos >= input.len() {
            break;
        }
        let end = (pos + size).min(input.len());
        let block = &input[pos..end];
        let mut out = vec![0.0; src.max_output(block.len())];
        let n = src.process_float(&[block], &mut [&mut out[..]]);
        output.extend_from_slice(&out[..n]);
        pos = end;
    }
    output
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The four rate queries bracket each other in both modes:
    /// `max_input(min_output(n)) <= n <= min_input(max_output(n))`.
    #[test]
    fn rate_queries_are_consistent_inverses(
        input_rate in 1u32..=200_000,
        output_rate in 1u32..=200_000,
        n in 0usize..100_000,
    ) {
        let stride = Stride::new(input_rate, output_rate);
        let min_out = stride.min_output(n);
        let max_out = stride.max_output(n);

        prop_assert!(min_out <= max_out && max_out <= min_out + 1,
            "{} -> {}: min {} max {}", input_rate, output_rate, min_out, max_out);
        prop_assert!(stride.max_input(min_out) <= n,
            "{} -> {}: max_input(min_output({})) = {}", input_rate, output_rate, n, stride.max_input(min_out));
        prop_assert!(stride.min_input(max_out) >= n,
            "{} -> {}: min_input(max_output({})) = {}", input_rate, output_rate, n, stride.min_input(max_out));
    }

    /// Output frames per call always lie within the rate bounds, wherever
    /// the previous calls left the phase.
    #[test]
    fn realized_output_within_bounds(
        input_rate in audio_rate(),
        output_rate in audio_rate(),
        blocks in prop::collection::vec(0usize..700, 1..12),
    ) {
        let mut src = Resampler::new(input_rate, output_rate, 1);
        let mut total_in = 0;
        let mut total_out = 0;
        for n in blocks {
            let input = vec![0.0f32; n];
            let mut output = vec![0.0f32; src.max_output(n)];
            let produced = src.process_float(&[&input[..]], &mut [&mut output[..]]);
            prop_assert!(produced >= src.min_output(n) && produced <= src.max_output(n),
                "{} -> {}: {} frames from {}", input_rate, output_rate, produced, n);
            total_in += n;
            total_out += produced;
        }
        prop_assert!(total_out >= src.min_output(total_in) && total_out <= src.max_output(total_in));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Arbitrary chunking gives bit-identical output to a single call.
    #[test]
    fn chunking_is_invisible(
        input_rate in audio_rate(),
        output_rate in audio_rate(),
        chunks in prop::collection::vec(1usize..500, 1..8),
        seed in any::<u32>(),
    ) {
        let mut state = seed;
        let input: Vec<f32> = (0..3000)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 8) as f32 / (1 << 24) as f32 - 0.5
            })
            .collect();

        let mut whole = Resampler::new(input_rate, output_rate, 1);
        let expected = process_chunked(&mut whole, &input, &[input.len()]);

        let mut split = Resampler::new(input_rate, output_rate, 1);
        let actual = process_chunked(&mut split, &input, &chunks);

        prop_assert_eq!(actual, expected);
    }

    /// A constant signal passes at (near) unity gain once the filter fills.
    #[test]
    fn dc_passes_near_unity(
        input_rate in audio_rate(),
        output_rate in audio_rate(),
        level in -0.9f32..0.9,
    ) {
        let mut src = Resampler::new(input_rate, output_rate, 1);
        let warmup = src.num_taps();
        let frames = 4 * warmup + 1000;
        let input = vec![level; frames];
        let mut output = vec![0.0f32; src.max_output(frames)];
        let n = src.process_float(&[&input[..]], &mut [&mut output[..]]);

        let settled = src.min_output(2 * warmup);
        prop_assert!(n > settled);
        for &y in &output[settled..n] {
            prop_assert!((y - level).abs() <= 0.01 * level.abs() + 1e-6,
                "{} -> {}: {} for level {}", input_rate, output_rate, y, level);
        }
    }
}
