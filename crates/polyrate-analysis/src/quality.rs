//! Conversion quality measurements
//!
//! Level, gain and spectral purity of tones before and after resampling.
//! Accumulations run in f64 so that measurements well past 100 dB are not
//! limited by the measuring code.

use crate::fft::Window;
use crate::spectrum::{frequency_bin, magnitude_spectrum};
use polyrate_core::{Resampler, ResamplerError};
use std::f64::consts::TAU;

/// Largest FFT used by [`spectral_purity_db`].
pub const MAX_FFT_SIZE: usize = 1 << 16;

/// Output frames analysed by [`measure_tone`].
pub const ANALYSIS_FRAMES: usize = 1 << 14;

/// Tone amplitude used by [`measure_tone`].
pub const TONE_AMPLITUDE: f64 = 0.5;

/// Level reported for silence.
const SILENCE_DB: f64 = -300.0;

/// RMS level of a signal (linear)
pub fn rms(signal: &[f32]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = signal.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    (sum_sq / signal.len() as f64).sqrt()
}

/// Convert a linear amplitude ratio to dB
pub fn to_db(linear: f64) -> f64 {
    if linear > 0.0 {
        20.0 * linear.log10()
    } else {
        SILENCE_DB
    }
}

/// Sine wave computed in f64
pub fn sine(freq: f64, sample_rate: f64, frames: usize, amplitude: f64) -> Vec<f32> {
    (0..frames)
        .map(|n| (amplitude * (TAU * freq * n as f64 / sample_rate).sin()) as f32)
        .collect()
}

/// Output level relative to input level in dB
pub fn gain_db(input: &[f32], output: &[f32]) -> f64 {
    to_db(rms(output) / rms(input))
}

/// Attenuation of `output` relative to `input` in dB (positive = quieter)
pub fn alias_rejection_db(input: &[f32], output: &[f32]) -> f64 {
    -gain_db(input, output)
}

/// Energy around `freq` versus everything else, in dB
///
/// Uses the largest power-of-two FFT that fits the signal (at most
/// [`MAX_FFT_SIZE`]) with a Blackman-Harris window. The tone's share is
/// the window main lobe plus two guard bins on each side; DC is excluded
/// from both sides. Returns `None` for signals shorter than 64 samples.
pub fn spectral_purity_db(signal: &[f32], sample_rate: f32, freq: f32) -> Option<f64> {
    if signal.len() < 64 {
        return None;
    }
    let fft_size = (1usize << signal.len().ilog2()).min(MAX_FFT_SIZE);
    let window = Window::BlackmanHarris;
    let spectrum = magnitude_spectrum(&signal[signal.len() - fft_size..], fft_size, window);

    let center = frequency_bin(freq, fft_size, sample_rate);
    let half_width = window.main_lobe_bins() + 2;
    let lo = center.saturating_sub(half_width).max(1);
    let hi = (center + half_width).min(spectrum.len() - 1);

    let mut tone = 0.0f64;
    let mut rest = 0.0f64;
    for (bin, &m) in spectrum.iter().enumerate().skip(1) {
        let power = f64::from(m) * f64::from(m);
        if (lo..=hi).contains(&bin) {
            tone += power;
        } else {
            rest += power;
        }
    }

    Some(10.0 * (tone / rest.max(1e-300)).log10())
}

/// Error from [`measure_tone`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeasureError {
    /// The rate pair or channel count was rejected.
    #[error("{0}")]
    Resampler(#[from] ResamplerError),
    /// The tone cannot be represented at the input rate.
    #[error("tone at {freq} Hz is not below the input Nyquist of {nyquist} Hz")]
    ToneAboveNyquist {
        /// Requested tone frequency in Hz.
        freq: f64,
        /// Input Nyquist frequency in Hz.
        nyquist: f64,
    },
}

/// Result of [`measure_tone`]
#[derive(Debug, Clone, PartialEq)]
pub struct ToneReport {
    /// Input sample rate in Hz
    pub input_rate: u32,
    /// Output sample rate in Hz
    pub output_rate: u32,
    /// Tone frequency in Hz
    pub freq: f64,
    /// Input frames generated
    pub input_frames: usize,
    /// Output frames produced
    pub output_frames: usize,
    /// Whether the tone lies at or above the output Nyquist frequency
    pub above_output_nyquist: bool,
    /// Steady-state output level relative to input level (dB)
    pub gain_db: f64,
    /// Tone energy versus everything else in the output (passband tones only)
    pub purity_db: Option<f64>,
    /// Attenuation of the tone (tones above the output Nyquist only)
    pub rejection_db: Option<f64>,
}

/// Resample a test tone and measure what comes out.
///
/// A [`TONE_AMPLITUDE`] sine at `freq` is converted in one float call, the
/// filter's fill-in transient is skipped and [`ANALYSIS_FRAMES`] output
/// frames are measured.
///
/// # Errors
///
/// Returns an error if the rates are invalid or `freq` is not below the
/// input Nyquist frequency.
pub fn measure_tone(input_rate: u32, output_rate: u32, freq: f64) -> Result<ToneReport, MeasureError> {
    let mut src = Resampler::try_new(input_rate, output_rate, 1)?;

    let nyquist = f64::from(input_rate) / 2.0;
    if !(freq > 0.0 && freq < nyquist) {
        return Err(MeasureError::ToneAboveNyquist { freq, nyquist });
    }

    let settle = src.max_output(src.num_taps()) + 1;
    let input_frames = src.min_input(settle + ANALYSIS_FRAMES) + 1;
    let input = sine(freq, f64::from(input_rate), input_frames, TONE_AMPLITUDE);

    let mut output = vec![0.0; src.max_output(input_frames)];
    let output_frames = src.process_float(&[&input[..]], &mut [&mut output[..]]);
    let measured = &output[settle.min(output_frames)..output_frames];

    let gain = gain_db(&input, measured);
    let above_output_nyquist = freq >= f64::from(output_rate) / 2.0;
    let (purity_db, rejection_db) = if above_output_nyquist {
        (None, Some(-gain))
    } else {
        (spectral_purity_db(measured, output_rate as f32, freq as f32), None)
    };

    Ok(ToneReport {
        input_rate,
        output_rate,
        freq,
        input_frames,
        output_frames,
        above_output_nyquist,
        gain_db: gain,
        purity_db,
        rejection_db,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_of_full_scale_sine() {
        let signal = sine(1000.0, 48_000.0, 48_000, 1.0);
        assert!((rms(&signal) - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-4);
    }

    #[test]
    fn silence_has_floor_level() {
        assert_eq!(to_db(0.0), SILENCE_DB);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn gain_of_halving_is_minus_six_db() {
        let input = sine(440.0, 48_000.0, 4800, 1.0);
        let output: Vec<f32> = input.iter().map(|&x| x * 0.5).collect();
        assert!((gain_db(&input, &output) + 6.0206).abs() < 1e-3);
        assert!((alias_rejection_db(&input, &output) - 6.0206).abs() < 1e-3);
    }

    #[test]
    fn pure_tone_is_pure() {
        let signal = sine(1000.0, 48_000.0, 16_384, 0.5);
        let purity = spectral_purity_db(&signal, 48_000.0, 1000.0).unwrap();
        assert!(purity > 80.0, "purity {purity:.1} dB");
    }

    #[test]
    fn two_tones_are_not_pure() {
        let a = sine(1000.0, 48_000.0, 16_384, 0.5);
        let b = sine(7000.0, 48_000.0, 16_384, 0.05);
        let mixed: Vec<f32> = a.iter().zip(&b).map(|(x, y)| x + y).collect();
        let purity = spectral_purity_db(&mixed, 48_000.0, 1000.0).unwrap();
        assert!((purity - 20.0).abs() < 0.5, "purity {purity:.2} dB");
    }

    #[test]
    fn short_signal_has_no_purity() {
        assert_eq!(spectral_purity_db(&[0.0; 10], 48_000.0, 1000.0), None);
    }

    #[test]
    fn measure_error_display_and_source() {
        use std::error::Error;

        let err = MeasureError::from(ResamplerError::ZeroOutputRate);
        assert_eq!(err.to_string(), ResamplerError::ZeroOutputRate.to_string());
        assert!(err.source().is_some());

        let err = MeasureError::ToneAboveNyquist {
            freq: 30_000.0,
            nyquist: 24_000.0,
        };
        assert_eq!(
            err.to_string(),
            "tone at 30000 Hz is not below the input Nyquist of 24000 Hz"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn measure_rejects_tone_above_input_nyquist() {
        let err = measure_tone(48_000, 44_100, 30_000.0).unwrap_err();
        assert!(matches!(err, MeasureError::ToneAboveNyquist { .. }));
        assert_eq!(
            measure_tone(0, 44_100, 1000.0).unwrap_err(),
            MeasureError::Resampler(ResamplerError::ZeroInputRate)
        );
    }
}
