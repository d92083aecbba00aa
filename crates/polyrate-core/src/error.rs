//! Construction errors.

use crate::resampler::MAX_CHANNELS;

/// Errors returned by [`Resampler::try_new`](crate::Resampler::try_new).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResamplerError {
    /// The input sample rate was zero.
    ZeroInputRate,
    /// The output sample rate was zero.
    ZeroOutputRate,
    /// The channel count was zero or above [`MAX_CHANNELS`].
    InvalidChannelCount(usize),
}

impl core::fmt::Display for ResamplerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroInputRate => write!(f, "input sample rate must be positive"),
            Self::ZeroOutputRate => write!(f, "output sample rate must be positive"),
            Self::InvalidChannelCount(n) => {
                write!(f, "channel count must be 1..={MAX_CHANNELS}, got {n}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ResamplerError {}
