//! polyrate CLI - streaming sample-rate conversion from the command line.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "polyrate")]
#[command(author, version, about = "Polyphase sample-rate converter", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resample a WAV file
    Convert(commands::convert::ConvertArgs),

    /// Show the filter design and rate bounds for a rate pair
    Info(commands::info::InfoArgs),

    /// Measure gain, purity and alias rejection with test tones
    Measure(commands::measure::MeasureArgs),

    /// List built-in and user conversion profiles
    Profiles(commands::profiles::ProfilesArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert(args) => commands::convert::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Measure(args) => commands::measure::run(args),
        Commands::Profiles(args) => commands::profiles::run(args),
    }
}
