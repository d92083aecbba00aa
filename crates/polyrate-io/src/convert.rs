//! Streaming file conversion.

use crate::wav::read_i16_samples;
use crate::{Error, Result, WavSpec};
use hound::{WavReader, WavWriter};
use polyrate_core::{Dither, MAX_CHANNELS, ResampleMode, Resampler};
use std::path::Path;

/// Input frames read from disk per resampler call.
pub const CHUNK_FRAMES: usize = 8192;

/// Summary of a finished [`convert_file`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertStats {
    /// Source sample rate in Hz.
    pub input_rate: u32,
    /// Destination sample rate in Hz.
    pub output_rate: u32,
    /// Channel count of both files.
    pub channels: u16,
    /// Frames read.
    pub input_frames: u64,
    /// Frames written.
    pub output_frames: u64,
    /// Resampling mode used.
    pub mode: ResampleMode,
}

/// Resample a WAV file to `output_rate`, writing 16-bit PCM.
///
/// The input is streamed in [`CHUNK_FRAMES`] blocks; `on_progress` is
/// called after each block with `(frames_done, total_frames)`. Input files
/// of any depth are converted to 16 bits first (see
/// [`read_wav_i16`](crate::read_wav_i16)).
///
/// # Errors
///
/// Fails on I/O or WAV format errors, on more than two channels, and on an
/// invalid rate.
pub fn convert_file<P, Q, F>(
    input: P,
    output: Q,
    output_rate: u32,
    dither: Dither,
    mut on_progress: F,
) -> Result<ConvertStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: FnMut(u64, u64),
{
    let mut reader = WavReader::open(input.as_ref())?;
    let spec = WavSpec::from(reader.spec());
    if spec.channels == 0 || usize::from(spec.channels) > MAX_CHANNELS {
        return Err(Error::UnsupportedChannels(spec.channels));
    }
    let channels = usize::from(spec.channels);
    let total_frames = u64::from(reader.duration());

    let mut src = Resampler::try_new(spec.sample_rate, output_rate, channels)?.with_dither(dither);

    tracing::info!(
        input = %input.as_ref().display(),
        output = %output.as_ref().display(),
        input_rate = spec.sample_rate,
        output_rate,
        channels,
        mode = %src.mode(),
        taps = src.num_taps(),
        "conversion started"
    );

    let mut writer = WavWriter::create(output.as_ref(), WavSpec::pcm16(spec.channels, output_rate).into())?;

    let mut in_buf = Vec::with_capacity(CHUNK_FRAMES * channels);
    let mut out_buf = vec![0i16; src.max_output(CHUNK_FRAMES) * channels];
    let mut input_frames = 0u64;
    let mut output_frames = 0u64;

    loop {
        in_buf.clear();
        let read = read_i16_samples(&mut reader, &mut in_buf, CHUNK_FRAMES * channels)?;
        // A truncated final frame is dropped.
        in_buf.truncate(read - read % channels);
        if in_buf.is_empty() {
            break;
        }

        let frames = src.render(&in_buf, &mut out_buf);
        for &sample in &out_buf[..frames * channels] {
            writer.write_sample(sample)?;
        }

        input_frames += (in_buf.len() / channels) as u64;
        output_frames += frames as u64;
        on_progress(input_frames, total_frames);

        if read < CHUNK_FRAMES * channels {
            break;
        }
    }

    writer.finalize()?;

    tracing::info!(input_frames, output_frames, "conversion finished");

    Ok(ConvertStats {
        input_rate: spec.sample_rate,
        output_rate,
        channels: spec.channels,
        input_frames,
        output_frames,
        mode: src.mode(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{read_wav_i16, write_wav_i16};
    use tempfile::tempdir;

    #[test]
    fn converts_silence_with_exact_length() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        write_wav_i16(&input, &vec![0; 48_000], 1, 48_000).unwrap();

        let stats = convert_file(&input, &output, 24_000, Dither::None, |_, _| {}).unwrap();
        assert_eq!(stats.input_frames, 48_000);
        assert_eq!(stats.output_frames, 24_000);
        assert_eq!(stats.mode, ResampleMode::Rational);

        let (samples, spec) = read_wav_i16(&output).unwrap();
        assert_eq!(spec, WavSpec::pcm16(1, 24_000));
        assert_eq!(samples, vec![0; 24_000]);
    }

    #[test]
    fn progress_reaches_total() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        let frames = 3 * CHUNK_FRAMES + 17;
        write_wav_i16(&input, &vec![100; frames * 2], 2, 44_100).unwrap();

        let mut calls = Vec::new();
        convert_file(&input, &output, 48_000, Dither::None, |done, total| {
            calls.push((done, total));
        })
        .unwrap();

        assert_eq!(calls.len(), 4);
        assert_eq!(calls.last(), Some(&(frames as u64, frames as u64)));
        assert!(calls.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn rejects_surround_files() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        write_wav_i16(&input, &[0; 60], 6, 48_000).unwrap();

        let err = convert_file(&input, dir.path().join("out.wav"), 44_100, Dither::None, |_, _| {})
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedChannels(6)));
    }

    #[test]
    fn rejects_zero_output_rate() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        write_wav_i16(&input, &[0; 10], 1, 48_000).unwrap();

        let err = convert_file(&input, dir.path().join("out.wav"), 0, Dither::None, |_, _| {})
            .unwrap_err();
        assert!(matches!(err, Error::Resampler(_)));
    }
}
