//! Profile validation.
//!
//! Checks that a [`Profile`] describes a conversion the resampler can run.
//!
//! # Example
//!
//! ```rust
//! use polyrate_config::{Profile, ValidationError, validate_profile};
//!
//! assert!(validate_profile(&Profile::new("cd", 44100)).is_ok());
//! assert_eq!(
//!     validate_profile(&Profile::new("broken", 0)),
//!     Err(ValidationError::ZeroOutputRate)
//! );
//! ```

use crate::Profile;
use polyrate_core::MAX_CHANNELS;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The profile has no name.
    #[error("profile name must not be empty")]
    EmptyName,

    /// Output rate of zero.
    #[error("output rate must be positive")]
    ZeroOutputRate,

    /// Channel count the resampler does not support.
    #[error("channel count {channels} out of range [1, {max}]")]
    ChannelsOutOfRange {
        /// The requested channel count.
        channels: u16,
        /// Largest supported channel count.
        max: usize,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a profile.
///
/// All problems are reported: a single failure is returned as is, several
/// are wrapped in [`ValidationError::Multiple`].
pub fn validate_profile(profile: &Profile) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if profile.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }
    if profile.output_rate == 0 {
        errors.push(ValidationError::ZeroOutputRate);
    }
    if let Some(channels) = profile.channels
        && (channels == 0 || usize::from(channels) > MAX_CHANNELS)
    {
        errors.push(ValidationError::ChannelsOutOfRange {
            channels,
            max: MAX_CHANNELS,
        });
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
