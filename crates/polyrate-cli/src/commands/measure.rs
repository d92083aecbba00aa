//! Test-tone quality measurement.

use clap::Args;
use polyrate_analysis::{ToneReport, measure_tone};

/// Measure a rate pair with sine tones.
#[derive(Args)]
pub struct MeasureArgs {
    /// Input sample rate in Hz
    #[arg(long, value_name = "HZ")]
    from: u32,

    /// Output sample rate in Hz
    #[arg(long, value_name = "HZ")]
    to: u32,

    /// Tone frequency in Hz (repeatable; defaults to a sweep)
    #[arg(long, value_name = "HZ")]
    freq: Vec<f64>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// Run the measure command.
pub fn run(args: MeasureArgs) -> anyhow::Result<()> {
    let freqs = if args.freq.is_empty() {
        default_tones(args.from, args.to)
    } else {
        args.freq
    };

    let reports = freqs
        .iter()
        .map(|&freq| measure_tone(args.from, args.to, freq))
        .collect::<Result<Vec<_>, _>>()?;

    if args.json {
        let rows: Vec<_> = reports.iter().map(report_json).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{} Hz -> {} Hz", args.from, args.to);
    println!();
    println!("{:>10}  {:>10}  {:>12}", "Tone (Hz)", "Gain (dB)", "Quality (dB)");
    println!("{}", "-".repeat(36));
    for report in &reports {
        let quality = match (report.purity_db, report.rejection_db) {
            (Some(purity), _) => format!("{purity:.1} pure"),
            (None, Some(rejection)) => format!("{rejection:.1} rej"),
            (None, None) => "-".to_string(),
        };
        println!("{:>10.1}  {:>10.3}  {:>12}", report.freq, report.gain_db, quality);
    }

    Ok(())
}

/// 1 kHz, the upper passband of both rates and, when downsampling, a tone
/// the filter has to reject.
fn default_tones(from: u32, to: u32) -> Vec<f64> {
    let input_nyquist = f64::from(from) / 2.0;
    let band_edge = f64::from(from.min(to)) / 2.0;

    let mut tones = vec![1000.0, 0.8 * band_edge];
    if to < from {
        tones.push(band_edge + 0.5 * (input_nyquist - band_edge));
    }
    tones.retain(|&f| f > 0.0 && f < input_nyquist);
    tones.sort_by(f64::total_cmp);
    tones.dedup();
    tones
}

fn report_json(report: &ToneReport) -> serde_json::Value {
    serde_json::json!({
        "input_rate": report.input_rate,
        "output_rate": report.output_rate,
        "freq": report.freq,
        "input_frames": report.input_frames,
        "output_frames": report.output_frames,
        "above_output_nyquist": report.above_output_nyquist,
        "gain_db": report.gain_db,
        "purity_db": report.purity_db,
        "rejection_db": report.rejection_db,
    })
}
