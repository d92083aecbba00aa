//! Sample format adapters between interleaved `i16` PCM and planar `f32`.
//!
//! Input is scaled by `1 / 32768` into `[-1.0, 1.0)`. Output is scaled by
//! `32768`, optionally dithered, saturated to the `i16` range and truncated
//! toward zero.
//!
//! ## Dither
//!
//! [`Dither::Triangular`] adds TPDF noise of +-1 LSB (the difference of two
//! uniform 16-bit draws) and then rounds to nearest, decorrelating the
//! quantization error from the signal. The generator is a 32-bit LCG
//! (`r = r * 69069 + 1`, upper 16 bits used) owned by each converter, so two
//! resamplers never share noise state.

/// `i16` full scale.
const I16_SCALE: f32 = 32768.0;

/// Output dithering mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dither {
    /// Truncate without dither.
    #[default]
    None,
    /// Triangular-PDF dither followed by rounding.
    Triangular,
}

impl core::fmt::Display for Dither {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Triangular => write!(f, "triangular"),
        }
    }
}

/// Per-instance dither generator.
#[derive(Debug, Clone)]
pub struct Ditherer {
    mode: Dither,
    state: u32,
}

impl Ditherer {
    /// Seed used at construction and on reset.
    pub const SEED: u32 = 1;

    /// Create a generator for `mode`.
    pub fn new(mode: Dither) -> Self {
        Self {
            mode,
            state: Self::SEED,
        }
    }

    /// Dither mode.
    pub fn mode(&self) -> Dither {
        self.mode
    }

    /// Restart the noise sequence.
    pub fn reset(&mut self) {
        self.state = Self::SEED;
    }

    /// Next 16-bit uniform draw.
    #[inline]
    fn next_u16(&mut self) -> i32 {
        self.state = self.state.wrapping_mul(69_069).wrapping_add(1);
        (self.state >> 16) as i32
    }

    /// Quantize one sample already scaled to `i16` units.
    #[inline]
    fn quantize(&mut self, mut f: f32) -> i16 {
        if self.mode == Dither::Triangular {
            let r0 = self.next_u16();
            let r1 = self.next_u16();
            f += (r0 - r1) as f32 * (1.0 / 65536.0);
            f += if f < 0.0 { -0.5 } else { 0.5 };
        }
        f.clamp(-32768.0, 32767.0) as i16
    }
}

impl Default for Ditherer {
    fn default() -> Self {
        Self::new(Dither::None)
    }
}

/// Convert interleaved `i16` to planar `f32`, one output slice per channel.
///
/// # Panics
///
/// Panics if `input` holds fewer than `frames * outputs.len()` samples or an
/// output slice is shorter than `frames`.
pub fn deinterleave_i16(input: &[i16], outputs: &mut [&mut [f32]], frames: usize) {
    let channels = outputs.len();
    assert!(input.len() >= frames * channels, "interleaved input too short");

    for (i, frame) in input.chunks_exact(channels).take(frames).enumerate() {
        for (out, &sample) in outputs.iter_mut().zip(frame) {
            out[i] = f32::from(sample) * (1.0 / I16_SCALE);
        }
    }
}

/// Convert planar `f32` to interleaved `i16`, saturating out-of-range values.
///
/// # Panics
///
/// Panics if `output` holds fewer than `frames * inputs.len()` samples or an
/// input slice is shorter than `frames`.
pub fn interleave_i16(inputs: &[&[f32]], output: &mut [i16], frames: usize, ditherer: &mut Ditherer) {
    let channels = inputs.len();
    assert!(output.len() >= frames * channels, "interleaved output too short");

    for (i, frame) in output.chunks_exact_mut(channels).take(frames).enumerate() {
        for (out, input) in frame.iter_mut().zip(inputs) {
            *out = ditherer.quantize(input[i] * I16_SCALE);
        }
    }
}
