//! File conversion command.

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use polyrate_config::resolve_profile;
use polyrate_core::Dither;
use polyrate_io::{convert_file, read_wav_info};
use std::path::PathBuf;

#[derive(Args)]
pub struct ConvertArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file (16-bit PCM)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Output sample rate in Hz
    #[arg(short, long, value_name = "HZ", required_unless_present = "profile", conflicts_with = "profile")]
    rate: Option<u32>,

    /// Conversion profile (built-in name, user profile name or TOML path)
    #[arg(short, long, value_name = "NAME")]
    profile: Option<String>,

    /// Apply triangular dither to the 16-bit output
    #[arg(short, long)]
    dither: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

pub fn run(args: ConvertArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.input)?;

    let (output_rate, mut dither) = match (&args.profile, args.rate) {
        (Some(name), _) => {
            let profile = resolve_profile(name)?;
            if !profile.accepts_channels(info.channels) {
                anyhow::bail!(
                    "Profile '{}' requires {} channel(s), '{}' has {}",
                    profile.name,
                    profile.channels.unwrap_or_default(),
                    args.input.display(),
                    info.channels
                );
            }
            tracing::info!(profile = %profile.name, rate = profile.output_rate, "using profile");
            (profile.output_rate, profile.dither)
        }
        (None, Some(rate)) => (rate, Dither::None),
        (None, None) => anyhow::bail!("No output rate specified. Use --rate or --profile"),
    };
    if args.dither {
        dither = Dither::Triangular;
    }

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(info.num_frames)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames ({eta})")?
            .progress_chars("##-"),
    );

    let stats = convert_file(&args.input, &args.output, output_rate, dither, |done, _| {
        pb.set_position(done);
    })?;
    pb.finish_and_clear();

    println!(
        "{} -> {}",
        args.input.display(),
        args.output.display()
    );
    println!(
        "  {} Hz -> {} Hz, {} channel(s), {} mode, dither {}",
        stats.input_rate, stats.output_rate, stats.channels, stats.mode, dither
    );
    println!(
        "  {} frames in, {} frames out",
        stats.input_frames, stats.output_frames
    );

    Ok(())
}
