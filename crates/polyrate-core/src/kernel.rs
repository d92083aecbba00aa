//! Multirate FIR kernel.
//!
//! Produces output frames from a window of planar input, one phase
//! dot-product per output frame, and carries the fractional position across
//! calls. The stepping scheme is fixed at construction:
//!
//! - [`Stepping::Rational`]: integer frame index plus phase counter, advanced
//!   from an exact step table. Never drifts.
//! - [`Stepping::Irrational`]: Q32 position. The top [`PHASE_BITS`] of the
//!   fraction pick a phase, the rest linearly blend it with the next phase.
//!
//! The kernel is generic over the channel count so mono and stereo share one
//! fused loop: every channel is convolved against the same coefficients in
//! the same pass, with one accumulator per channel.
//!
//! # Input window
//!
//! Output frame `i` reads input samples `i .. i + num_taps`, so each input
//! slice must hold `frames + num_taps - 1` samples. The caller (see
//! [`Resampler`](crate::Resampler)) prepends the history tail to make that
//! true across block boundaries.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::design::{PolyphaseFilter, design_irrational, design_rational};
use crate::fixed::Q32;
use crate::ratio::{PHASE_BITS, ResampleMode, Stride};

/// Fraction bits left after the phase index is taken.
const SUBPHASE_BITS: u32 = 32 - PHASE_BITS;

/// Mask for the inter-phase blend fraction.
const SUBPHASE_MASK: u32 = (1 << SUBPHASE_BITS) - 1;

/// Scale from the blend fraction to `[0.0, 1.0)`.
const SUBPHASE_TO_FLOAT: f32 = 1.0 / (1u32 << SUBPHASE_BITS) as f32;

/// Position state of the kernel.
#[derive(Debug, Clone)]
pub enum Stepping {
    /// Exact stepping over a phase cycle.
    Rational {
        /// Input frames to advance after each phase.
        steps: Vec<usize>,
        /// Next phase to use.
        phase: usize,
        /// Phases per cycle.
        up_factor: usize,
        /// Input frames to skip at the start of the next call.
        skip: usize,
    },
    /// Fixed-point stepping with inter-phase interpolation.
    Irrational {
        /// Input advance per output frame.
        step: Q32,
        /// Position of the next output frame relative to the next call's
        /// first frame.
        offset: Q32,
    },
}

impl Stepping {
    fn reset(&mut self) {
        match self {
            Self::Rational { phase, skip, .. } => {
                *phase = 0;
                *skip = 0;
            }
            Self::Irrational { offset, .. } => *offset = Q32::ZERO,
        }
    }
}

/// Polyphase filter bank plus stepping state.
#[derive(Debug, Clone)]
pub struct Kernel {
    filter: PolyphaseFilter,
    stepping: Stepping,
}

impl Kernel {
    /// Design the filter bank for `stride` at unity gain.
    pub fn new(stride: &Stride) -> Self {
        let up = stride.up_factor() as usize;
        let down = stride.down_factor() as usize;

        match stride.step() {
            None => {
                let design = design_rational(up, down, 1.0);
                Self {
                    filter: design.filter,
                    stepping: Stepping::Rational {
                        steps: design.steps,
                        phase: 0,
                        up_factor: up,
                        skip: 0,
                    },
                }
            }
            Some(step) => Self {
                filter: design_irrational(up, down, 1.0),
                stepping: Stepping::Irrational {
                    step,
                    offset: Q32::ZERO,
                },
            },
        }
    }

    /// Taps per phase.
    pub fn num_taps(&self) -> usize {
        self.filter.num_taps()
    }

    /// Current stepping state.
    pub fn stepping(&self) -> &Stepping {
        &self.stepping
    }

    /// Stepping mode.
    pub fn mode(&self) -> ResampleMode {
        match self.stepping {
            Stepping::Rational { .. } => ResampleMode::Rational,
            Stepping::Irrational { .. } => ResampleMode::Irrational,
        }
    }

    /// Rewind to the construction-time position.
    pub fn reset(&mut self) {
        self.stepping.reset();
    }

    /// Filter `frames` frames of `C` planar channels into `outputs`.
    ///
    /// Returns the number of output frames written to each channel.
    ///
    /// # Panics
    ///
    /// Panics if an input slice is shorter than `frames + num_taps - 1` or an
    /// output slice is too short for the frames produced.
    pub fn run<const C: usize>(
        &mut self,
        inputs: [&[f32]; C],
        mut outputs: [&mut [f32]; C],
        frames: usize,
    ) -> usize {
        let num_taps = self.filter.num_taps();
        for input in &inputs {
            assert!(
                input.len() + 1 >= frames + num_taps,
                "input window holds {} samples, need {}",
                input.len(),
                frames + num_taps - 1
            );
        }

        let mut produced = 0;

        match &mut self.stepping {
            Stepping::Rational {
                steps,
                phase,
                up_factor,
                skip,
            } => {
                let mut i = *skip;

                while i < frames {
                    let coefs = self.filter.phase(*phase);
                    let acc = convolve(&inputs, i, coefs);
                    for (out, value) in outputs.iter_mut().zip(acc) {
                        out[produced] = value;
                    }
                    produced += 1;

                    i += steps[*phase];
                    *phase += 1;
                    if *phase == *up_factor {
                        *phase = 0;
                    }
                }
                *skip = i - frames;
            }
            Stepping::Irrational { step, offset } => {
                debug_assert!(u32::try_from(frames).is_ok());

                while offset.integer() < frames {
                    let i = offset.integer();
                    let f = offset.fraction();

                    let phase = (f >> SUBPHASE_BITS) as usize;
                    let frac = (f & SUBPHASE_MASK) as f32 * SUBPHASE_TO_FLOAT;

                    let acc = convolve_blended(
                        &inputs,
                        i,
                        self.filter.phase(phase),
                        self.filter.phase(phase + 1),
                        frac,
                    );
                    for (out, value) in outputs.iter_mut().zip(acc) {
                        out[produced] = value;
                    }
                    produced += 1;

                    *offset += *step;
                }
                *offset -= Q32::from_int(frames as u32);
            }
        }

        produced
    }
}

/// Dot product of one phase against each channel's window starting at `start`.
#[inline(always)]
fn convolve<const C: usize>(inputs: &[&[f32]; C], start: usize, coefs: &[f32]) -> [f32; C] {
    let windows: [&[f32]; C] =
        core::array::from_fn(|ch| &inputs[ch][start..start + coefs.len()]);
    let mut acc = [0.0f32; C];

    for (j, &coef) in coefs.iter().enumerate() {
        for ch in 0..C {
            acc[ch] += windows[ch][j] * coef;
        }
    }
    acc
}

/// Like [`convolve`], with coefficients blended `c0 + frac * (c1 - c0)`.
#[inline(always)]
fn convolve_blended<const C: usize>(
    inputs: &[&[f32]; C],
    start: usize,
    c0: &[f32],
    c1: &[f32],
    frac: f32,
) -> [f32; C] {
    let windows: [&[f32]; C] = core::array::from_fn(|ch| &inputs[ch][start..start + c0.len()]);
    let mut acc = [0.0f32; C];

    for (j, (&a, &b)) in c0.iter().zip(c1).enumerate() {
        let coef = a + frac * (b - a);
        for ch in 0..C {
            acc[ch] += windows[ch][j] * coef;
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prototype::{PROTOTYPE_FILTER, PROTOTYPE_PHASES, PROTOTYPE_TAPS};

    fn padded(kernel: &Kernel, frames: usize) -> Vec<f32> {
        vec![0.0; frames + kernel.num_taps() - 1]
    }

    #[test]
    fn zero_in_zero_out() {
        let mut kernel = Kernel::new(&Stride::new(48_000, 24_000));
        let input = padded(&kernel, 480);
        let mut output = vec![1.0; 480];
        let n = kernel.run([&input[..]], [&mut output[..]], 480);
        assert_eq!(n, 240);
        assert!(output[..n].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn unity_ratio_impulse_response_is_prototype_phase() {
        let mut kernel = Kernel::new(&Stride::new(48_000, 48_000));
        assert_eq!(kernel.num_taps(), PROTOTYPE_TAPS);

        let frames = PROTOTYPE_TAPS;
        let mut input = padded(&kernel, frames);
        input[PROTOTYPE_TAPS - 1] = 1.0;
        let mut output = vec![0.0; frames];
        let n = kernel.run([&input[..]], [&mut output[..]], frames);
        assert_eq!(n, frames);

        for (t, &y) in output.iter().enumerate() {
            assert_eq!(y, PROTOTYPE_FILTER[t * PROTOTYPE_PHASES + 16], "tap {t}");
        }
    }

    #[test]
    fn rational_position_carries_across_calls() {
        let stride = Stride::new(44_100, 48_000);
        let mut whole = Kernel::new(&stride);
        let mut split = Kernel::new(&stride);

        let input: Vec<f32> = (0..2000).map(|i| ((i * 7919) % 257) as f32 / 257.0).collect();
        let frames = input.len() - whole.num_taps() + 1;

        let mut out_whole = vec![0.0; stride.max_output(frames)];
        let n_whole = whole.run([&input[..]], [&mut out_whole[..]], frames);

        // Split into two calls; the second window starts where the first ended.
        let first = 700;
        let mut out_split = vec![0.0; stride.max_output(frames)];
        let taps = split.num_taps();
        let n1 = split.run([&input[..first + taps - 1]], [&mut out_split[..]], first);
        let (_, rest) = out_split.split_at_mut(n1);
        let n2 = split.run([&input[first..]], [rest], frames - first);

        assert_eq!(n1 + n2, n_whole);
        assert_eq!(&out_split[..n_whole], &out_whole[..n_whole]);
    }

    #[test]
    fn irrational_position_carries_across_calls() {
        let stride = Stride::new(44_100, 44_101);
        let mut whole = Kernel::new(&stride);
        let mut split = Kernel::new(&stride);
        assert_eq!(whole.mode(), ResampleMode::Irrational);

        let input: Vec<f32> = (0..1500).map(|i| ((i * 31) % 101) as f32 / 101.0 - 0.5).collect();
        let frames = input.len() - whole.num_taps() + 1;

        let mut out_whole = vec![0.0; stride.max_output(frames)];
        let n_whole = whole.run([&input[..]], [&mut out_whole[..]], frames);

        let first = 333;
        let mut out_split = vec![0.0; stride.max_output(frames)];
        let taps = split.num_taps();
        let n1 = split.run([&input[..first + taps - 1]], [&mut out_split[..]], first);
        let (_, rest) = out_split.split_at_mut(n1);
        let n2 = split.run([&input[first..]], [rest], frames - first);

        assert_eq!(n1 + n2, n_whole);
        assert_eq!(&out_split[..n_whole], &out_whole[..n_whole]);
    }

    #[test]
    fn stereo_matches_two_mono_passes() {
        let stride = Stride::new(32_000, 48_000);
        let left: Vec<f32> = (0..600).map(|i| (i as f32 * 0.01).sin()).collect();
        let right: Vec<f32> = (0..600).map(|i| (i as f32 * 0.03).cos()).collect();

        let mut stereo = Kernel::new(&stride);
        let frames = left.len() - stereo.num_taps() + 1;
        let cap = stride.max_output(frames);

        let (mut out_l, mut out_r) = (vec![0.0; cap], vec![0.0; cap]);
        let n = stereo.run([&left[..], &right[..]], [&mut out_l[..], &mut out_r[..]], frames);

        let mut mono = Kernel::new(&stride);
        let mut ref_l = vec![0.0; cap];
        assert_eq!(mono.run([&left[..]], [&mut ref_l[..]], frames), n);
        let mut mono = Kernel::new(&stride);
        let mut ref_r = vec![0.0; cap];
        assert_eq!(mono.run([&right[..]], [&mut ref_r[..]], frames), n);

        assert_eq!(out_l[..n], ref_l[..n]);
        assert_eq!(out_r[..n], ref_r[..n]);
    }

    #[test]
    fn stereo_irrational_matches_two_mono_passes() {
        let stride = Stride::new(44_100, 44_101);
        let left: Vec<f32> = (0..5200).map(|i| (i as f32 * 0.013).sin()).collect();
        let right: Vec<f32> = (0..5200).map(|i| ((i * 37) % 113) as f32 / 113.0 - 0.5).collect();

        let mut stereo = Kernel::new(&stride);
        assert_eq!(stereo.mode(), ResampleMode::Irrational);
        let taps = stereo.num_taps();
        let frames = left.len() - taps + 1;
        let cap = stride.max_output(frames);

        // Stereo in uneven chunks, each mono channel in one call.
        let (mut out_l, mut out_r) = (vec![0.0; cap], vec![0.0; cap]);
        let mut produced = 0;
        let mut start = 0;
        for len in [1, 97, 1024, 2000].into_iter().chain(core::iter::repeat(frames)) {
            let len = len.min(frames - start);
            if len == 0 {
                break;
            }
            let window = start..start + len + taps - 1;
            produced += stereo.run(
                [&left[window.clone()], &right[window]],
                [&mut out_l[produced..], &mut out_r[produced..]],
                len,
            );
            start += len;
        }

        let mut mono = Kernel::new(&stride);
        let mut ref_l = vec![0.0; cap];
        assert_eq!(mono.run([&left[..]], [&mut ref_l[..]], frames), produced);
        let mut mono = Kernel::new(&stride);
        let mut ref_r = vec![0.0; cap];
        assert_eq!(mono.run([&right[..]], [&mut ref_r[..]], frames), produced);

        assert_eq!(out_l[..produced], ref_l[..produced]);
        assert_eq!(out_r[..produced], ref_r[..produced]);
    }

    #[test]
    fn rational_phase_wraps_at_up_factor() {
        let stride = Stride::new(44_100, 48_000);
        let mut kernel = Kernel::new(&stride);
        let Stepping::Rational { steps, up_factor, .. } = kernel.stepping() else {
            panic!("44.1k -> 48k is rational");
        };
        assert_eq!(*up_factor, 160);
        assert_eq!(steps.len(), 160);
        assert_eq!(steps.iter().sum::<usize>(), 147);

        // One full cycle of input returns to phase 0 with nothing to skip.
        let input = padded(&kernel, 147);
        let mut output = vec![0.0; 160];
        assert_eq!(kernel.run([&input[..]], [&mut output[..]], 147), 160);
        let Stepping::Rational { phase, skip, .. } = kernel.stepping() else {
            unreachable!();
        };
        assert_eq!((*phase, *skip), (0, 0));
    }

    #[test]
    fn reset_rewinds_position() {
        let stride = Stride::new(48_000, 44_100);
        let mut kernel = Kernel::new(&stride);
        let input = padded(&kernel, 17);
        let mut output = vec![0.0; 32];
        kernel.run([&input[..]], [&mut output[..]], 17);
        kernel.reset();
        match kernel.stepping() {
            Stepping::Rational { phase, skip, .. } => {
                assert_eq!(*phase, 0);
                assert_eq!(*skip, 0);
            }
            Stepping::Irrational { .. } => panic!("48k -> 44.1k is rational"),
        }
    }

    #[test]
    #[should_panic]
    fn short_input_window_panics() {
        let mut kernel = Kernel::new(&Stride::new(48_000, 48_000));
        let input = vec![0.0; 10];
        let mut output = vec![0.0; 10];
        kernel.run([&input[..]], [&mut output[..]], 10);
    }
}
