//! Filter design and rate-bound report for a rate pair.

use clap::Args;
use polyrate_core::Resampler;

/// Show how a rate pair would be converted.
#[derive(Args)]
pub struct InfoArgs {
    /// Input sample rate in Hz
    #[arg(long, value_name = "HZ")]
    from: u32,

    /// Output sample rate in Hz
    #[arg(long, value_name = "HZ")]
    to: u32,

    /// Channel count (1 or 2)
    #[arg(short, long, default_value = "1")]
    channels: usize,

    /// Frame count used for the rate bounds
    #[arg(short, long, default_value = "1024")]
    frames: usize,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let src = Resampler::try_new(args.from, args.to, args.channels)?;
    let n = args.frames;

    if args.json {
        let report = serde_json::json!({
            "input_rate": src.input_rate(),
            "output_rate": src.output_rate(),
            "channels": src.channels(),
            "mode": src.mode().to_string(),
            "up_factor": src.up_factor(),
            "down_factor": src.down_factor(),
            "num_taps": src.num_taps(),
            "num_history": src.num_history(),
            "frames": n,
            "min_output": src.min_output(n),
            "max_output": src.max_output(n),
            "min_input": src.min_input(n),
            "max_input": src.max_input(n),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Conversion:  {} Hz -> {} Hz, {} channel(s)", src.input_rate(), src.output_rate(), src.channels());
    println!("Mode:        {}", src.mode());
    println!("Factors:     up {} / down {}", src.up_factor(), src.down_factor());
    println!("Taps:        {} ({} history frames)", src.num_taps(), src.num_history());
    println!();
    println!("For {n} frames:");
    println!("  output from {n} input:       {} ..= {}", src.min_output(n), src.max_output(n));
    println!("  input for at least {n} out:  {}", src.min_input(n));
    println!("  input for at most {n} out:   {}", src.max_input(n));

    Ok(())
}
