//! WAV file reading and writing.
//!
//! The resampler's native format is interleaved 16-bit PCM, so integer files
//! of other depths are shifted to 16 bits and float files are scaled by
//! `32768` and saturated. Planar float I/O is provided for the float path.

use crate::Result;
use hound::{SampleFormat, WavReader, WavWriter};
use std::io::Read;
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.duration());

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs: num_frames as f64 / f64::from(spec.sample_rate),
        format: match spec.sample_format {
            SampleFormat::Float => WavFormat::IeeeFloat,
            SampleFormat::Int => WavFormat::Pcm,
        },
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample. 32 is written as float, anything else as PCM.
    pub bits_per_sample: u16,
}

impl WavSpec {
    /// 16-bit PCM at `sample_rate`.
    pub fn pcm16(channels: u16, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
            bits_per_sample: 16,
        }
    }
}

impl Default for WavSpec {
    fn default() -> Self {
        Self::pcm16(1, 48000)
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Scale a float sample to 16 bits, saturating.
#[inline]
pub(crate) fn float_to_i16(sample: f32) -> i16 {
    (sample * 32768.0).clamp(-32768.0, 32767.0) as i16
}

/// Shift an integer sample of `bits` depth to 16 bits.
#[inline]
pub(crate) fn int_to_i16(sample: i32, bits: u16) -> i16 {
    if bits > 16 {
        (sample >> (bits - 16)) as i16
    } else {
        (sample << (16 - bits)) as i16
    }
}

/// Append up to `max` samples from `reader` to `buf` as 16-bit PCM.
///
/// Returns the number of samples appended; fewer than `max` means the end
/// of the data was reached.
pub(crate) fn read_i16_samples<R: Read>(
    reader: &mut WavReader<R>,
    buf: &mut Vec<i16>,
    max: usize,
) -> Result<usize> {
    let spec = reader.spec();
    let start = buf.len();
    match spec.sample_format {
        SampleFormat::Float => {
            for sample in reader.samples::<f32>().take(max) {
                buf.push(float_to_i16(sample?));
            }
        }
        SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            for sample in reader.samples::<i32>().take(max) {
                buf.push(int_to_i16(sample?, bits));
            }
        }
    }
    Ok(buf.len() - start)
}

/// Read a whole WAV file as interleaved 16-bit PCM.
///
/// # Example
/// ```ignore
/// let (samples, spec) = read_wav_i16("input.wav")?;
/// println!("{} frames at {} Hz", samples.len() / spec.channels as usize, spec.sample_rate);
/// ```
pub fn read_wav_i16<P: AsRef<Path>>(path: P) -> Result<(Vec<i16>, WavSpec)> {
    let mut reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let mut samples = Vec::with_capacity(reader.len() as usize);
    read_i16_samples(&mut reader, &mut samples, usize::MAX)?;
    Ok((samples, spec))
}

/// Write interleaved 16-bit PCM.
pub fn write_wav_i16<P: AsRef<Path>>(
    path: P,
    samples: &[i16],
    channels: u16,
    sample_rate: u32,
) -> Result<()> {
    let mut writer = WavWriter::create(path, WavSpec::pcm16(channels, sample_rate).into())?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Read a WAV file as planar float, one `Vec` per channel.
///
/// Integer samples are scaled to `[-1.0, 1.0)`.
pub fn read_wav_planar<P: AsRef<Path>>(path: P) -> Result<(Vec<Vec<f32>>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let mut planar = vec![Vec::with_capacity(interleaved.len() / channels); channels];
    for frame in interleaved.chunks_exact(channels) {
        for (channel, &sample) in planar.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }
    Ok((planar, spec))
}

/// Write planar float channels, interleaving them.
///
/// `spec.channels` is taken from `channels.len()`. Integer depths are
/// scaled and saturated.
///
/// # Example
/// ```ignore
/// let left = vec![0.0f32; 48000];
/// let right = vec![0.0f32; 48000];
/// let spec = WavSpec { sample_rate: 48000, bits_per_sample: 32, ..Default::default() };
/// write_wav_planar("output.wav", &[&left, &right], spec)?;
/// ```
pub fn write_wav_planar<P: AsRef<Path>>(path: P, channels: &[&[f32]], spec: WavSpec) -> Result<()> {
    let spec = WavSpec {
        channels: channels.len() as u16,
        ..spec
    };
    let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut writer = WavWriter::create(path, spec.into())?;

    if spec.bits_per_sample == 32 {
        for i in 0..frames {
            for channel in channels {
                writer.write_sample(channel[i])?;
            }
        }
    } else {
        let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
        for i in 0..frames {
            for channel in channels {
                let int_sample = (channel[i] * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}
