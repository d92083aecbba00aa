//! Profiles bundled with the library.
//!
//! These are always available without external files and take precedence
//! over user profiles of the same name.

use crate::Profile;

/// Names of the built-in profiles.
pub static BUILTIN_PROFILE_NAMES: &[&str] = &["cd", "dvd", "wideband", "narrowband", "hires"];

/// TOML content for the built-in profiles, embedded at compile time.
///
/// Every entry must parse; `test_builtin_profiles_load` checks that none is
/// dropped by the lookups below.
static BUILTIN_PROFILES_TOML: &[(&str, &str)] = &[
    ("cd", CD_PROFILE),
    ("dvd", DVD_PROFILE),
    ("wideband", WIDEBAND_PROFILE),
    ("narrowband", NARROWBAND_PROFILE),
    ("hires", HIRES_PROFILE),
];

const CD_PROFILE: &str = r#"
name = "cd"
description = "Red Book audio, 44.1 kHz"
output_rate = 44100
dither = "triangular"
"#;

const DVD_PROFILE: &str = r#"
name = "dvd"
description = "Video and broadcast audio, 48 kHz"
output_rate = 48000
dither = "triangular"
"#;

/// Wideband speech (G.722).
const WIDEBAND_PROFILE: &str = r#"
name = "wideband"
description = "Wideband voice, 16 kHz mono"
output_rate = 16000
channels = 1
dither = "triangular"
"#;

/// Telephone band.
const NARROWBAND_PROFILE: &str = r#"
name = "narrowband"
description = "Narrowband voice, 8 kHz mono"
output_rate = 8000
channels = 1
dither = "triangular"
"#;

const HIRES_PROFILE: &str = r#"
name = "hires"
description = "High-resolution audio, 96 kHz"
output_rate = 96000
dither = "triangular"
"#;

/// All built-in profiles.
///
/// # Example
///
/// ```rust
/// use polyrate_config::builtin_profiles;
///
/// for profile in builtin_profiles() {
///     println!("{:>10}  {} Hz", profile.name, profile.output_rate);
/// }
/// ```
pub fn builtin_profiles() -> Vec<Profile> {
    BUILTIN_PROFILES_TOML
        .iter()
        .filter_map(|(_, toml)| Profile::from_toml(toml).ok())
        .collect()
}

/// Get a built-in profile by name (case-insensitive).
pub fn builtin_profile(name: &str) -> Option<Profile> {
    BUILTIN_PROFILES_TOML
        .iter()
        .find(|(profile_name, _)| profile_name.eq_ignore_ascii_case(name))
        .and_then(|(_, toml)| Profile::from_toml(toml).ok())
}

/// Check if a name refers to a built-in profile (case-insensitive).
pub fn is_builtin_profile(name: &str) -> bool {
    BUILTIN_PROFILE_NAMES
        .iter()
        .any(|builtin| builtin.eq_ignore_ascii_case(name))
}
