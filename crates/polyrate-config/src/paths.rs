//! Platform-specific paths for profiles and configuration.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/polyrate/` (Linux), `~/Library/Application Support/polyrate/` (macOS), `%APPDATA%\polyrate\` (Windows)
//! - **User profiles**: the `profiles/` subdirectory of the user config directory
//!
//! # Example
//!
//! ```rust,no_run
//! use polyrate_config::paths;
//!
//! println!("User profiles: {:?}", paths::user_profiles_dir());
//!
//! if let Some(path) = paths::find_profile("podcast") {
//!     println!("Found profile at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::{ConfigError, Profile, builtin_profile, validate_profile};

/// Application name used for directory paths.
const APP_NAME: &str = "polyrate";

/// Subdirectory name for profiles.
const PROFILES_SUBDIR: &str = "profiles";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific profiles directory.
pub fn user_profiles_dir() -> PathBuf {
    user_config_dir().join(PROFILES_SUBDIR)
}

/// Find a profile file by name.
///
/// The name can be a path to a TOML file, or a profile name (with or
/// without `.toml`) looked up in the user profiles directory.
pub fn find_profile(name: &str) -> Option<PathBuf> {
    find_profile_in(name, &user_profiles_dir())
}

fn find_profile_in(name: &str, dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    let user_path = dir.join(filename);
    user_path.is_file().then_some(user_path)
}

/// Resolve a profile name to a validated [`Profile`].
///
/// Built-in profiles are checked first, then files found by
/// [`find_profile`].
///
/// # Errors
///
/// Returns [`ConfigError::ProfileNotFound`] if nothing matches, and the
/// load or validation error of a matching file otherwise.
pub fn resolve_profile(name: &str) -> Result<Profile, ConfigError> {
    resolve_profile_in(name, &user_profiles_dir())
}

fn resolve_profile_in(name: &str, dir: &Path) -> Result<Profile, ConfigError> {
    if let Some(profile) = builtin_profile(name) {
        return Ok(profile);
    }
    let path =
        find_profile_in(name, dir).ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))?;
    let profile = Profile::load(path)?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// List all profile files in the user profiles directory, sorted by path.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_profiles() -> Vec<PathBuf> {
    list_profiles_in_dir(&user_profiles_dir())
}

fn list_profiles_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut profiles: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    profiles.sort();
    profiles
}

/// Get the profile name from a file path (the file stem).
///
/// # Example
///
/// ```rust
/// use polyrate_config::paths::profile_name_from_path;
/// use std::path::Path;
///
/// let name = profile_name_from_path(Path::new("/path/to/podcast.toml"));
/// assert_eq!(name, Some("podcast".to_string()));
/// ```
pub fn profile_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_user_dirs() {
        assert!(user_config_dir().ends_with("polyrate"));
        assert!(user_profiles_dir().ends_with("polyrate/profiles"));
    }

    #[test]
    fn test_find_profile_by_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("podcast.toml");
        fs::write(&path, "name = \"podcast\"\noutput_rate = 44100\n").unwrap();

        assert_eq!(find_profile(path.to_str().unwrap()), Some(path));
    }

    #[test]
    fn test_find_profile_adds_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("podcast.toml");
        fs::write(&path, "").unwrap();

        assert_eq!(find_profile_in("podcast", temp_dir.path()), Some(path.clone()));
        assert_eq!(find_profile_in("podcast.toml", temp_dir.path()), Some(path));
        assert_eq!(find_profile_in("missing", temp_dir.path()), None);
    }

    #[test]
    fn test_resolve_prefers_builtin() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("cd.toml"), "name = \"cd\"\noutput_rate = 1\n").unwrap();

        let profile = resolve_profile_in("cd", temp_dir.path()).unwrap();
        assert_eq!(profile.output_rate, 44100);
    }

    #[test]
    fn test_resolve_user_profile() {
        let temp_dir = TempDir::new().unwrap();
        Profile::new("podcast", 44100)
            .with_channels(1)
            .save(temp_dir.path().join("podcast.toml"))
            .unwrap();

        let profile = resolve_profile_in("podcast", temp_dir.path()).unwrap();
        assert_eq!(profile.channels, Some(1));
    }

    #[test]
    fn test_resolve_validates() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("zero.toml"), "name = \"zero\"\noutput_rate = 0\n").unwrap();

        let err = resolve_profile_in("zero", temp_dir.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::ZeroOutputRate)
        ));
    }

    #[test]
    fn test_resolve_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = resolve_profile_in("nonexistent_profile_12345", temp_dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound(ref name) if name == "nonexistent_profile_12345"));
    }

    #[test]
    fn test_list_profiles_in_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.toml"), "").unwrap();
        fs::write(temp_dir.path().join("a.toml"), "").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();

        let profiles = list_profiles_in_dir(temp_dir.path());
        let names: Vec<_> = profiles
            .iter()
            .filter_map(|p| profile_name_from_path(p))
            .collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_list_profiles_nonexistent_dir() {
        assert!(list_profiles_in_dir(Path::new("/nonexistent/path/12345")).is_empty());
    }
}
