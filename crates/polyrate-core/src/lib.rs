//! Polyrate Core - polyphase streaming sample-rate conversion
//!
//! This crate converts PCM audio between arbitrary sample rates with a
//! polyphase FIR filter bank derived from one fixed high-quality prototype,
//! designed for streaming use with no allocation once constructed.
//!
//! # Core Abstractions
//!
//! ## Streaming
//!
//! - [`Resampler`] - Stateful converter for interleaved `i16` or planar `f32`
//! - [`Dither`] - Optional TPDF dither on the `i16` output path
//!
//! ## Rate Arithmetic
//!
//! - [`Stride`] - Reduced ratio, mode selection and buffer-size queries
//! - [`RateRatio`] / [`ResampleMode`] - Rational or irrational stepping
//! - [`Q32`] - Q32.32 fixed-point positions
//!
//! ## Filter Design
//!
//! - [`design_rational`] / [`design_irrational`] - Polyphase tables from
//!   cubic interpolation of [`PROTOTYPE_FILTER`]
//! - [`Kernel`] - The multirate FIR loop over a designed table
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc` for its tables).
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! polyrate-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use polyrate_core::{Dither, Resampler};
//!
//! let mut src = Resampler::new(44_100, 48_000, 2).with_dither(Dither::Triangular);
//!
//! let input = vec![0i16; 2 * 4410];
//! let mut output = vec![0i16; 2 * src.max_output(4410)];
//! let frames = src.render(&input, &mut output);
//! assert_eq!(frames, 4800);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: Tables and scratch buffers are sized at construction
//! - **Deterministic**: Fixed-point stepping, bit-identical across block sizes
//! - **No dependencies on std**: Pure `no_std` + `alloc`

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod convert;
pub mod design;
pub mod error;
pub mod fixed;
pub mod kernel;
pub mod prototype;
pub mod ratio;
pub mod resampler;

// Re-export main types at crate root
pub use convert::{Dither, Ditherer, deinterleave_i16, interleave_i16};
pub use design::{PolyphaseFilter, RationalDesign, cubic_interpolation, design_irrational, design_rational};
pub use error::ResamplerError;
pub use fixed::Q32;
pub use kernel::{Kernel, Stepping};
pub use prototype::{PROTOTYPE_COEFS, PROTOTYPE_FILTER, PROTOTYPE_PHASES, PROTOTYPE_TAPS};
pub use ratio::{
    IRRATIONAL_PHASES, PHASE_BITS, RATIONAL_PHASE_LIMIT, RateRatio, ResampleMode, Stride, gcd,
};
pub use resampler::{MAX_CHANNELS, Resampler, SRC_BLOCK};
