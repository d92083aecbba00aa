//! Polyphase filter design.
//!
//! Builds the coefficient tables the streaming kernel convolves with. Every
//! table is derived from the single [`PROTOTYPE_FILTER`] by resampling its
//! coefficients to `num_taps x num_phases` with cubic Lagrange
//! interpolation, then splitting the result into phases.
//!
//! ## Downsampling
//!
//! When `down > up` the filter cutoff must drop below the *output* Nyquist.
//! By the time-scaling property of the Fourier transform, stretching the
//! impulse response by `down / up` lowers the cutoff by the same factor, so
//! the prototype is interpolated onto `down / up` times as many coefficients
//! (more taps per phase). The gain is scaled by the old/new coefficient count
//! ratio to keep the passband near unity.
//!
//! ## Layout
//!
//! Taps are stored time-reversed within each phase, so the convolution in
//! the kernel is a forward dot product against the input window.
//!
//! - Rational tables are ordered *by use*: phase `i` holds prototype phase
//!   `(i * down) % up`, and a step table says how far to advance after it.
//! - Irrational tables are ordered *by fractional delay* and carry one extra
//!   wrap phase so that phase `p` can always be blended with `p + 1`.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::fixed::Q32;
use crate::prototype::{PROTOTYPE_FILTER, PROTOTYPE_TAPS};

/// 3rd-order Lagrange interpolation using the Farrow structure.
///
/// Resamples `input` onto `output.len()` evenly spaced points and scales by
/// `gain`. Samples outside the input window are treated as zero. When
/// shrinking, sampling starts half a step in, which keeps small integer
/// ratios on exact input points.
///
/// Lagrange interpolation is maximally flat near DC, which suits the heavily
/// oversampled prototype.
pub fn cubic_interpolation(input: &[f32], output: &mut [f32], gain: f32) {
    let input_size = input.len();
    let output_size = output.len();
    if input_size == 0 || output_size == 0 {
        return;
    }

    let step = Q32::from_bits(((input_size as u64) << 32) / output_size as u64);
    let mut offset = if output_size < input_size {
        step / 2
    } else {
        Q32::ZERO
    };

    let at = |k: usize| input.get(k).copied().unwrap_or(0.0);

    for out in output.iter_mut() {
        let i = offset.integer();

        let x0 = if i == 0 { 0.0 } else { at(i - 1) };
        let x1 = at(i);
        let x2 = at(i + 1);
        let x3 = at(i + 2);

        let c0 = (1.0 / 6.0) * (x3 - x0) + (1.0 / 2.0) * (x1 - x2);
        let c1 = (1.0 / 2.0) * (x0 + x2) - x1;
        let c2 = x2 - (1.0 / 3.0) * x0 - (1.0 / 2.0) * x1 - (1.0 / 6.0) * x3;
        let c3 = x1;

        let frac = offset.fraction_f32();
        *out = (((c0 * frac + c1) * frac + c2) * frac + c3) * gain;

        offset += step;
    }
}

/// A bank of equal-length FIR phases, taps time-reversed.
#[derive(Debug, Clone)]
pub struct PolyphaseFilter {
    coefs: Vec<f32>,
    num_taps: usize,
    num_phases: usize,
}

impl PolyphaseFilter {
    /// Taps per phase.
    pub fn num_taps(&self) -> usize {
        self.num_taps
    }

    /// Number of designed phases (excluding an irrational wrap phase).
    pub fn num_phases(&self) -> usize {
        self.num_phases
    }

    /// Number of stored phases (including an irrational wrap phase).
    pub fn stored_phases(&self) -> usize {
        self.coefs.len() / self.num_taps
    }

    /// Coefficients of one phase.
    #[inline]
    pub fn phase(&self, index: usize) -> &[f32] {
        let start = index * self.num_taps;
        &self.coefs[start..start + self.num_taps]
    }

    /// All coefficients, phase-major.
    pub fn coefficients(&self) -> &[f32] {
        &self.coefs
    }
}

/// Output of [`design_rational`].
#[derive(Debug, Clone)]
pub struct RationalDesign {
    /// Phases ordered by use.
    pub filter: PolyphaseFilter,
    /// Input frames to advance after using each phase.
    pub steps: Vec<usize>,
}

/// Tap count, coefficient count and gain after the downsampling adjustment.
fn scaled_length(up: usize, down: usize, gain: f32) -> (usize, usize, f32) {
    let old_coefs = PROTOTYPE_TAPS * up;
    if down > up {
        let num_coefs = ((old_coefs as u64 * down as u64) / up as u64) as usize;
        let num_taps = num_coefs.div_ceil(up);
        let gain = gain * (old_coefs as f32 / num_coefs as f32);
        (num_taps, num_coefs, gain)
    } else {
        (PROTOTYPE_TAPS, old_coefs, gain)
    }
}

/// Interpolate the prototype onto `num_taps x num_phases` coefficients,
/// zero padded past `num_coefs`.
fn interpolate_prototype(num_taps: usize, num_phases: usize, num_coefs: usize, gain: f32) -> Vec<f32> {
    let mut temp = vec![0.0f32; num_taps * num_phases];
    cubic_interpolation(&PROTOTYPE_FILTER, &mut temp[..num_coefs], gain);
    temp
}

/// Copy prototype phase `phase` into `dest`, taps reversed.
#[inline]
fn reversed_phase(temp: &[f32], num_taps: usize, num_phases: usize, phase: usize, dest: &mut [f32]) {
    for (j, coef) in dest.iter_mut().enumerate() {
        *coef = temp[(num_taps - j - 1) * num_phases + phase];
    }
}

/// Design an exact polyphase filter for `up / down`.
///
/// Returns `up` phases ordered by use plus the step table. Over a full cycle
/// the steps sum to exactly `down`.
///
/// # Panics
///
/// Panics if `up` or `down` is zero.
pub fn design_rational(up: usize, down: usize, gain: f32) -> RationalDesign {
    assert!(up > 0 && down > 0, "up and down factors must be positive");

    let num_phases = up;
    let (num_taps, num_coefs, gain) = scaled_length(up, down, gain);
    let temp = interpolate_prototype(num_taps, num_phases, num_coefs, gain);

    let mut coefs = vec![0.0f32; num_taps * num_phases];
    for (i, dest) in coefs.chunks_exact_mut(num_taps).enumerate() {
        let phase = (i * down) % up;
        reversed_phase(&temp, num_taps, num_phases, phase, dest);
    }

    let (up64, down64) = (up as u64, down as u64);
    let steps = (0..up as u64)
        .map(|i| (((i + 1) * down64) / up64 - (i * down64) / up64) as usize)
        .collect();

    RationalDesign {
        filter: PolyphaseFilter {
            coefs,
            num_taps,
            num_phases,
        },
        steps,
    }
}

/// Design an interpolated polyphase filter with `up` phases for the
/// (truncated) ratio `up / down`.
///
/// The table holds `up + 1` phases; the last is phase 0 delayed by one tap.
/// `down` only selects the downsampling stretch and may be zero for very
/// large upsampling ratios.
///
/// # Panics
///
/// Panics if `up` is zero.
pub fn design_irrational(up: usize, down: usize, gain: f32) -> PolyphaseFilter {
    assert!(up > 0, "up factor must be positive");

    let num_phases = up;
    let (num_taps, num_coefs, gain) = scaled_length(up, down, gain);
    let temp = interpolate_prototype(num_taps, num_phases, num_coefs, gain);

    let mut coefs = vec![0.0f32; num_taps * (num_phases + 1)];
    for (phase, dest) in coefs.chunks_exact_mut(num_taps).take(num_phases).enumerate() {
        reversed_phase(&temp, num_taps, num_phases, phase, dest);
    }

    // The first prototype coefficient is zero, so the last tap of phase 0 is
    // too, and shifting phase 0 by one tap continues the cycle exactly.
    assert_eq!(coefs[num_taps - 1], 0.0, "phase 0 must end in a zero tap");

    let wrap = num_taps * num_phases;
    coefs[wrap] = 0.0;
    coefs.copy_within(0..num_taps - 1, wrap + 1);

    PolyphaseFilter {
        coefs,
        num_taps,
        num_phases,
    }
}
