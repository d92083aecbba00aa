//! Integration tests for polyrate-config.

use polyrate_config::{
    ConfigError, Profile, ValidationError, builtin_profiles, list_user_profiles,
    profile_name_from_path, validate_profile,
};
use polyrate_core::{Dither, Resampler};
use tempfile::TempDir;

/// Every built-in profile configures a working resampler from common rates.
#[test]
fn test_builtin_profiles_drive_resampler() {
    for profile in builtin_profiles() {
        let channels = profile.channels.map_or(2, usize::from);
        for input_rate in [44_100, 48_000] {
            let mut src = Resampler::try_new(input_rate, profile.output_rate, channels)
                .unwrap_or_else(|e| panic!("{}: {e}", profile.name))
                .with_dither(profile.dither);

            let input = vec![0i16; 4800 * channels];
            let mut output = vec![0i16; src.max_output(4800) * channels];
            let frames = src.render(&input, &mut output);
            assert!(frames >= src.min_output(4800), "{}", profile.name);
        }
    }
}

/// A profile saved to disk is found again by name.
#[test]
fn test_saved_profile_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("profiles").join("podcast.toml");
    let profile = Profile::new("podcast", 44_100)
        .with_description("Spoken word")
        .with_channels(1)
        .with_dither(Dither::Triangular);

    profile.save(&path).unwrap();
    let loaded = Profile::load(&path).unwrap();
    assert_eq!(loaded, profile);
    assert_eq!(profile_name_from_path(&path).as_deref(), Some("podcast"));
    assert!(validate_profile(&loaded).is_ok());
}

/// Hand-written files with mistakes surface the right errors.
#[test]
fn test_bad_profile_files() {
    let temp_dir = TempDir::new().unwrap();

    let syntax = temp_dir.path().join("syntax.toml");
    std::fs::write(&syntax, "name = \n").unwrap();
    assert!(matches!(Profile::load(&syntax), Err(ConfigError::TomlParse(_))));

    let surround = temp_dir.path().join("surround.toml");
    std::fs::write(&surround, "name = \"surround\"\noutput_rate = 48000\nchannels = 6\n").unwrap();
    let profile = Profile::load(&surround).unwrap();
    assert!(matches!(
        validate_profile(&profile),
        Err(ValidationError::ChannelsOutOfRange { channels: 6, .. })
    ));
}

/// Listing never fails, even when the user directory is missing.
#[test]
fn test_list_user_profiles_does_not_panic() {
    for path in list_user_profiles() {
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
    }
}
