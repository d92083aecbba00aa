//! Conversion profiles for the polyrate sample-rate converter.
//!
//! A profile names a target format: output rate, optional channel count and
//! dither mode. Profiles are stored as TOML files in the user configuration
//! directory, and a handful of common targets are built in.
//!
//! # Features
//!
//! - **Profiles**: Load and save conversion profiles from TOML files
//! - **Validation**: Reject profiles the resampler cannot run
//! - **Paths**: Platform-specific profile directory (`std` feature)
//! - **Built-in Profiles**: `cd`, `dvd`, `wideband`, `narrowband`, `hires`
//!
//! # Example
//!
//! ```rust
//! use polyrate_config::{Profile, builtin_profile, validate_profile};
//! use polyrate_core::Dither;
//!
//! let cd = builtin_profile("cd").unwrap();
//! assert_eq!(cd.output_rate, 44100);
//!
//! let custom = Profile::new("broadcast", 32000)
//!     .with_description("FM broadcast chain")
//!     .with_dither(Dither::Triangular);
//! validate_profile(&custom).unwrap();
//!
//! let text = custom.to_toml().unwrap();
//! assert_eq!(Profile::from_toml(&text).unwrap(), custom);
//! ```

mod builtin;
mod error;
mod profile;

/// Platform-specific paths for profiles and configuration.
#[cfg(feature = "std")]
pub mod paths;

/// Profile validation.
pub mod validation;

pub use builtin::{BUILTIN_PROFILE_NAMES, builtin_profile, builtin_profiles, is_builtin_profile};
pub use error::ConfigError;
#[cfg(feature = "std")]
pub use paths::{
    find_profile, list_user_profiles, profile_name_from_path, resolve_profile, user_config_dir,
    user_profiles_dir,
};
pub use profile::Profile;
pub use validation::{ValidationError, ValidationResult, validate_profile};
