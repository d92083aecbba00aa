//! Integration tests for polyrate-cli.
//!
//! Each test runs the `polyrate` binary with its configuration directory
//! redirected into a temporary directory.

use polyrate_io::{read_wav_i16, read_wav_info, write_wav_i16};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// The `polyrate` binary with user configuration rooted at `home`.
fn polyrate_bin(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_polyrate"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

fn run(home: &Path, args: &[&str]) -> Output {
    polyrate_bin(home)
        .args(args)
        .output()
        .expect("failed to run polyrate")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn tone(frames: usize, channels: usize) -> Vec<i16> {
    (0..frames)
        .flat_map(|n| {
            let s = (8000.0 * (n as f64 * 0.05).sin()) as i16;
            std::iter::repeat_n(s, channels)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// polyrate convert
// ---------------------------------------------------------------------------

#[test]
fn cli_convert_with_rate() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("in.wav");
    let output = home.path().join("out.wav");
    write_wav_i16(&input, &tone(48_000, 2), 2, 48_000).unwrap();

    let result = run(
        home.path(),
        &["convert", input.to_str().unwrap(), output.to_str().unwrap(), "--rate", "24000", "--quiet"],
    );
    assert!(result.status.success(), "stderr: {}", String::from_utf8_lossy(&result.stderr));
    assert!(stdout(&result).contains("48000 Hz -> 24000 Hz"));

    let info = read_wav_info(&output).unwrap();
    assert_eq!(info.sample_rate, 24_000);
    assert_eq!(info.channels, 2);
    assert_eq!(info.bits_per_sample, 16);
    assert_eq!(info.num_frames, 24_000);
}

#[test]
fn cli_convert_with_builtin_profile() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("in.wav");
    let output = home.path().join("out.wav");
    write_wav_i16(&input, &tone(4800, 1), 1, 48_000).unwrap();

    let result = run(
        home.path(),
        &["convert", input.to_str().unwrap(), output.to_str().unwrap(), "--profile", "narrowband", "-q"],
    );
    assert!(result.status.success(), "stderr: {}", String::from_utf8_lossy(&result.stderr));
    assert!(stdout(&result).contains("dither triangular"));

    let (samples, spec) = read_wav_i16(&output).unwrap();
    assert_eq!(spec.sample_rate, 8000);
    assert_eq!(samples.len(), 800);
}

#[test]
fn cli_convert_with_user_profile() {
    let home = TempDir::new().unwrap();
    let profiles = home.path().join(".config").join("polyrate").join("profiles");
    std::fs::create_dir_all(&profiles).unwrap();
    std::fs::write(
        profiles.join("podcast.toml"),
        "name = \"podcast\"\noutput_rate = 22050\n",
    )
    .unwrap();

    let input = home.path().join("in.wav");
    let output = home.path().join("out.wav");
    write_wav_i16(&input, &tone(44_100, 1), 1, 44_100).unwrap();

    let result = run(
        home.path(),
        &["convert", input.to_str().unwrap(), output.to_str().unwrap(), "--profile", "podcast", "-q"],
    );
    assert!(result.status.success(), "stderr: {}", String::from_utf8_lossy(&result.stderr));
    assert_eq!(read_wav_info(&output).unwrap().num_frames, 22_050);
}

#[test]
fn cli_convert_rejects_profile_channel_mismatch() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("in.wav");
    let output = home.path().join("out.wav");
    write_wav_i16(&input, &tone(480, 2), 2, 48_000).unwrap();

    let result = run(
        home.path(),
        &["convert", input.to_str().unwrap(), output.to_str().unwrap(), "--profile", "wideband", "-q"],
    );
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("requires 1 channel"));
    assert!(!output.exists());
}

#[test]
fn cli_convert_requires_rate_or_profile() {
    let home = TempDir::new().unwrap();
    let result = run(home.path(), &["convert", "in.wav", "out.wav"]);
    assert!(!result.status.success());

    let result = run(
        home.path(),
        &["convert", "in.wav", "out.wav", "--rate", "44100", "--profile", "cd"],
    );
    assert!(!result.status.success());
}

#[test]
fn cli_convert_unknown_profile_fails() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("in.wav");
    write_wav_i16(&input, &[0; 100], 1, 48_000).unwrap();

    let result = run(
        home.path(),
        &["convert", input.to_str().unwrap(), "out.wav", "--profile", "vinyl"],
    );
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("profile not found: vinyl"));
}

// ---------------------------------------------------------------------------
// polyrate info
// ---------------------------------------------------------------------------

#[test]
fn cli_info_text() {
    let home = TempDir::new().unwrap();
    let result = run(home.path(), &["info", "--from", "44100", "--to", "48000"]);
    assert!(result.status.success());

    let text = stdout(&result);
    assert!(text.contains("Mode:        rational"), "got: {text}");
    assert!(text.contains("up 160 / down 147"), "got: {text}");
}

#[test]
fn cli_info_json() {
    let home = TempDir::new().unwrap();
    let result = run(
        home.path(),
        &["info", "--from", "48000", "--to", "44100", "--channels", "2", "--frames", "480", "--json"],
    );
    assert!(result.status.success());

    let report: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(report["mode"], "rational");
    assert_eq!(report["up_factor"], 147);
    assert_eq!(report["down_factor"], 160);
    assert_eq!(report["channels"], 2);

    let min = report["min_output"].as_u64().unwrap();
    let max = report["max_output"].as_u64().unwrap();
    assert!(min <= 441 && 441 <= max, "{min} ..= {max}");
}

#[test]
fn cli_info_irrational_pair() {
    let home = TempDir::new().unwrap();
    let result = run(home.path(), &["info", "--from", "44100", "--to", "48001", "--json"]);
    assert!(result.status.success());

    let report: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(report["mode"], "irrational");
}

#[test]
fn cli_info_rejects_zero_rate() {
    let home = TempDir::new().unwrap();
    let result = run(home.path(), &["info", "--from", "0", "--to", "48000"]);
    assert!(!result.status.success());
}

// ---------------------------------------------------------------------------
// polyrate measure / profiles
// ---------------------------------------------------------------------------

#[test]
fn cli_measure_json_reports_rejection() {
    let home = TempDir::new().unwrap();
    let result = run(
        home.path(),
        &["measure", "--from", "48000", "--to", "24000", "--freq", "1000", "--freq", "18000", "--json"],
    );
    assert!(result.status.success(), "stderr: {}", String::from_utf8_lossy(&result.stderr));

    let rows: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);

    assert!(rows[0]["gain_db"].as_f64().unwrap().abs() < 0.1);
    assert!(rows[0]["purity_db"].as_f64().unwrap() > 70.0);
    assert!(rows[1]["rejection_db"].as_f64().unwrap() > 100.0);
}

#[test]
fn cli_measure_rejects_tone_above_nyquist() {
    let home = TempDir::new().unwrap();
    let result = run(home.path(), &["measure", "--from", "16000", "--to", "8000", "--freq", "9000"]);
    assert!(!result.status.success());
}

#[test]
fn cli_profiles_lists_builtin_and_user() {
    let home = TempDir::new().unwrap();
    let result = run(home.path(), &["profiles"]);
    assert!(result.status.success());

    let text = stdout(&result);
    for name in ["cd", "dvd", "wideband", "narrowband", "hires"] {
        assert!(text.contains(name), "missing {name}: {text}");
    }
    assert!(text.contains("(none)"));

    let profiles = home.path().join(".config").join("polyrate").join("profiles");
    std::fs::create_dir_all(&profiles).unwrap();
    std::fs::write(profiles.join("tape.toml"), "name = \"tape\"\noutput_rate = 32000\n").unwrap();

    let text = stdout(&run(home.path(), &["profiles", "--user"]));
    assert!(text.contains("tape"), "got: {text}");
    assert!(text.contains("32000 Hz"), "got: {text}");
    assert!(!text.contains("Built-in"), "got: {text}");
}
