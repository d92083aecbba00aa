//! WAV file I/O and file conversion for polyrate.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav_i16`] / [`write_wav_i16`] for the
//!   resampler's interleaved 16-bit format, [`read_wav_planar`] /
//!   [`write_wav_planar`] for planar float
//! - **File conversion**: [`convert_file`] streams a WAV file through a
//!   [`polyrate_core::Resampler`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use polyrate_core::Dither;
//! use polyrate_io::convert_file;
//!
//! let stats = convert_file("in.wav", "out.wav", 48000, Dither::Triangular, |done, total| {
//!     eprintln!("{done}/{total}");
//! })?;
//! println!("{} -> {} frames", stats.input_frames, stats.output_frames);
//! ```

mod convert;
mod wav;

pub use convert::{CHUNK_FRAMES, ConvertStats, convert_file};
pub use wav::{
    WavFormat, WavInfo, WavSpec, read_wav_i16, read_wav_info, read_wav_planar, write_wav_i16,
    write_wav_planar,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file has a channel count the resampler cannot carry.
    #[error("Unsupported channel count: {0} (expected 1 or 2)")]
    UnsupportedChannels(u16),

    /// The resampler rejected the conversion.
    #[error("Resampler error: {0}")]
    Resampler(#[from] polyrate_core::ResamplerError),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
