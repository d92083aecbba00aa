//! Profile file format and operations.

use polyrate_core::Dither;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

#[derive(Serialize, Deserialize)]
#[serde(remote = "Dither", rename_all = "lowercase")]
enum DitherDef {
    None,
    Triangular,
}

/// A named conversion target.
///
/// # TOML Format
///
/// ```toml
/// name = "cd"
/// description = "Red Book audio"
/// output_rate = 44100
/// channels = 2
/// dither = "triangular"
/// ```
///
/// `description` and `channels` may be omitted; `dither` defaults to
/// `"none"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Name of the profile.
    pub name: String,

    /// Optional description of the profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Target sample rate in Hz.
    pub output_rate: u32,

    /// Required channel count. Files with another count are rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u16>,

    /// Dither applied when writing 16-bit output.
    #[serde(default, with = "DitherDef")]
    pub dither: Dither,
}

impl Profile {
    /// Create a profile with no channel requirement and no dither.
    pub fn new(name: impl Into<String>, output_rate: u32) -> Self {
        Self {
            name: name.into(),
            description: None,
            output_rate,
            channels: None,
            dither: Dither::None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Require a channel count.
    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = Some(channels);
        self
    }

    /// Set the dither mode.
    pub fn with_dither(mut self, dither: Dither) -> Self {
        self.dither = dither;
        self
    }

    /// Whether a file with `channels` channels may use this profile.
    pub fn accepts_channels(&self, channels: u16) -> bool {
        self.channels.is_none_or(|required| required == channels)
    }

    /// Load a profile from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a profile from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the profile to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the profile to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
