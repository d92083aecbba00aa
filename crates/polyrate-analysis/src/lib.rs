//! Polyrate Analysis - Measurement tools for sample-rate conversion
//!
//! This crate measures what a [`polyrate_core::Resampler`] does to a signal:
//!
//! - [`fft`] - FFT wrapper with windowing functions
//! - [`spectrum`] - Magnitude and power spectra, peak bins
//! - [`quality`] - Gain, alias rejection and spectral purity of tones
//!
//! ## Example
//!
//! ```rust
//! use polyrate_analysis::measure_tone;
//!
//! // A 1 kHz tone from CD to DVD rate comes through at unity gain.
//! let report = measure_tone(44_100, 48_000, 1000.0).unwrap();
//! assert!(report.gain_db.abs() < 0.1);
//! assert!(!report.above_output_nyquist);
//! ```

pub mod fft;
pub mod quality;
pub mod spectrum;

pub use quality::{MeasureError, ToneReport, measure_tone};
