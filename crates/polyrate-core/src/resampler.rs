//! Streaming sample-rate converter.
//!
//! [`Resampler`] accepts blocks of any length and returns every output frame
//! those input frames determine, carrying the filter history and the
//! fractional position across calls. Splitting a stream into blocks of any
//! size produces bit-identical output to converting it in one call.
//!
//! # History
//!
//! Each channel keeps the last `num_history = num_taps - 1` input frames in a
//! buffer of `2 * num_history` frames. A call of `n` frames runs in two passes:
//!
//! 1. The first `min(num_history, n)` fresh frames are appended behind the
//!    history and the kernel runs over that window.
//! 2. Any remaining fresh frames are filtered straight from the caller's
//!    slice, whose head now overlaps the tail of pass 1.
//!
//! Afterwards the history holds the last `num_history` frames seen, taken
//! from the caller's slice or shifted within the buffer for short blocks.
//!
//! # Example
//!
//! ```rust
//! use polyrate_core::Resampler;
//!
//! let mut src = Resampler::new(48_000, 24_000, 1);
//! let input = vec![0i16; 480];
//! let output = src.render_to_vec(&input);
//! assert_eq!(output.len(), 240);
//! assert!(output.iter().all(|&s| s == 0));
//! ```

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::convert::{Dither, Ditherer, deinterleave_i16, interleave_i16};
use crate::error::ResamplerError;
use crate::kernel::Kernel;
use crate::ratio::{RateRatio, ResampleMode, Stride};

/// Most channels a resampler can carry.
pub const MAX_CHANNELS: usize = 2;

/// Frames per internal block in [`Resampler::render`].
pub const SRC_BLOCK: usize = 1024;

/// Polyphase streaming resampler for one or two channels.
#[derive(Debug, Clone)]
pub struct Resampler {
    stride: Stride,
    kernel: Kernel,
    channels: usize,
    num_history: usize,
    history: Vec<Vec<f32>>,
    ditherer: Ditherer,
    input_block: usize,
    input_scratch: [Vec<f32>; MAX_CHANNELS],
    output_scratch: [Vec<f32>; MAX_CHANNELS],
}

impl Resampler {
    /// Create a resampler, validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either rate is zero or `channels` is not in
    /// `1..=MAX_CHANNELS`.
    pub fn try_new(
        input_rate: u32,
        output_rate: u32,
        channels: usize,
    ) -> Result<Self, ResamplerError> {
        if input_rate == 0 {
            return Err(ResamplerError::ZeroInputRate);
        }
        if output_rate == 0 {
            return Err(ResamplerError::ZeroOutputRate);
        }
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(ResamplerError::InvalidChannelCount(channels));
        }

        let stride = Stride::new(input_rate, output_rate);
        let kernel = Kernel::new(&stride);
        let num_history = kernel.num_taps() - 1;

        let input_block = SRC_BLOCK.min(stride.max_input(SRC_BLOCK)).max(1);
        let output_capacity = SRC_BLOCK.max(stride.max_output(input_block));
        let scratch = |len: usize| -> [Vec<f32>; MAX_CHANNELS] {
            core::array::from_fn(|ch| if ch < channels { vec![0.0; len] } else { Vec::new() })
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "resampler: {input_rate} -> {output_rate} Hz, {} mode, up={} down={} taps={}",
            stride.mode(),
            stride.up_factor(),
            stride.down_factor(),
            kernel.num_taps()
        );

        Ok(Self {
            stride,
            kernel,
            channels,
            num_history,
            history: vec![vec![0.0; 2 * num_history]; channels],
            ditherer: Ditherer::default(),
            input_block,
            input_scratch: scratch(input_block),
            output_scratch: scratch(output_capacity),
        })
    }

    /// Create a resampler.
    ///
    /// # Panics
    ///
    /// Panics if either rate is zero or `channels` is not in
    /// `1..=MAX_CHANNELS`. Use [`try_new`](Self::try_new) to handle this.
    pub fn new(input_rate: u32, output_rate: u32, channels: usize) -> Self {
        match Self::try_new(input_rate, output_rate, channels) {
            Ok(src) => src,
            Err(err) => panic!("invalid resampler configuration: {err}"),
        }
    }

    /// Set the dither applied by [`render`](Self::render).
    #[must_use]
    pub fn with_dither(mut self, dither: Dither) -> Self {
        self.ditherer = Ditherer::new(dither);
        self
    }

    /// Input sample rate in Hz.
    pub fn input_rate(&self) -> u32 {
        self.stride.ratio().input_rate
    }

    /// Output sample rate in Hz.
    pub fn output_rate(&self) -> u32 {
        self.stride.ratio().output_rate
    }

    /// Channel count.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Taps per filter phase.
    pub fn num_taps(&self) -> usize {
        self.kernel.num_taps()
    }

    /// Input frames of history kept per channel.
    pub fn num_history(&self) -> usize {
        self.num_history
    }

    /// Stepping mode.
    pub fn mode(&self) -> ResampleMode {
        self.stride.mode()
    }

    /// Number of filter phases.
    pub fn up_factor(&self) -> u32 {
        self.stride.up_factor()
    }

    /// Input frames per phase cycle.
    pub fn down_factor(&self) -> u32 {
        self.stride.down_factor()
    }

    /// The reduced rate pair.
    pub fn ratio(&self) -> RateRatio {
        self.stride.ratio()
    }

    /// Dither mode.
    pub fn dither(&self) -> Dither {
        self.ditherer.mode()
    }

    /// Fewest output frames `input_frames` can produce.
    pub fn min_output(&self, input_frames: usize) -> usize {
        self.stride.min_output(input_frames)
    }

    /// Most output frames `input_frames` can produce. Size output buffers
    /// with this.
    pub fn max_output(&self, input_frames: usize) -> usize {
        self.stride.max_output(input_frames)
    }

    /// Fewest input frames guaranteed to produce at least `output_frames`.
    pub fn min_input(&self, output_frames: usize) -> usize {
        self.stride.min_input(output_frames)
    }

    /// Most input frames that produce at most `output_frames`.
    pub fn max_input(&self, output_frames: usize) -> usize {
        self.stride.max_input(output_frames)
    }

    /// Clear the history and rewind the position and the dither sequence.
    pub fn reset(&mut self) {
        for history in &mut self.history {
            history.fill(0.0);
        }
        self.kernel.reset();
        self.ditherer.reset();
    }

    /// Resample planar float audio.
    ///
    /// `inputs` and `outputs` hold one slice per channel. All input slices
    /// must have the same length; each output slice must hold at least
    /// [`max_output`](Self::max_output) of that length. Returns the number
    /// of frames written to each output slice.
    ///
    /// # Panics
    ///
    /// Panics on a channel count mismatch, unequal input lengths, or output
    /// slices that are too short.
    pub fn process_float(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]]) -> usize {
        assert_eq!(inputs.len(), self.channels, "input channel count");
        assert_eq!(outputs.len(), self.channels, "output channel count");

        let frames = inputs[0].len();
        let capacity = self.stride.max_output(frames);
        for (input, output) in inputs.iter().zip(outputs.iter()) {
            assert_eq!(input.len(), frames, "input channels differ in length");
            assert!(
                output.len() >= capacity,
                "output holds {} frames, need {capacity}",
                output.len()
            );
        }

        let produced = match outputs {
            [out] => self.process_channels([inputs[0]], [&mut **out]),
            [left, right] => {
                self.process_channels([inputs[0], inputs[1]], [&mut **left, &mut **right])
            }
            _ => unreachable!("channel count is validated at construction"),
        };
        assert!(produced <= capacity, "produced {produced} frames, limit {capacity}");
        produced
    }

    fn process_channels<const C: usize>(
        &mut self,
        inputs: [&[f32]; C],
        mut outputs: [&mut [f32]; C],
    ) -> usize {
        let frames = inputs[0].len();
        let num_history = self.num_history;
        let nh = num_history.min(frames);
        let ni = frames - nh;

        for (history, input) in self.history.iter_mut().zip(inputs) {
            history[num_history..num_history + nh].copy_from_slice(&input[..nh]);
        }

        let windows: [&[f32]; C] =
            core::array::from_fn(|ch| &self.history[ch][..num_history + nh]);
        let mut produced = self.kernel.run(windows, outputs.each_mut().map(|out| &mut **out), nh);

        if ni > 0 {
            let tail = outputs.each_mut().map(|out| &mut out[produced..]);
            produced += self.kernel.run(inputs, tail, ni);
        }

        for (history, input) in self.history.iter_mut().zip(inputs) {
            if ni > 0 {
                history[..num_history].copy_from_slice(&input[ni..]);
            } else {
                history.copy_within(nh..nh + num_history, 0);
            }
        }

        produced
    }

    /// Resample interleaved 16-bit audio.
    ///
    /// The input is converted in blocks of at most [`SRC_BLOCK`] frames.
    /// `output` must hold at least `max_output(frames) * channels` samples.
    /// Returns the number of output frames written.
    ///
    /// # Panics
    ///
    /// Panics if `input.len()` is not a multiple of the channel count or
    /// `output` is too short.
    pub fn render(&mut self, input: &[i16], output: &mut [i16]) -> usize {
        let channels = self.channels;
        assert!(
            input.len() % channels == 0,
            "interleaved input of {} samples is not a whole number of {channels}-channel frames",
            input.len()
        );
        let frames = input.len() / channels;
        assert!(
            output.len() >= self.stride.max_output(frames) * channels,
            "interleaved output too short"
        );

        let mut in_buf = core::mem::take(&mut self.input_scratch);
        let mut out_buf = core::mem::take(&mut self.output_scratch);
        let mut written = 0;

        for block in input.chunks(self.input_block * channels) {
            let n = block.len() / channels;

            let mut planar_in = channel_slices(&mut in_buf, n);
            deinterleave_i16(block, &mut planar_in[..channels], n);
            let planar_in = planar_in.map(|s| &*s);

            let mut planar_out = channel_slices(&mut out_buf, usize::MAX);
            let produced = self.process_float(&planar_in[..channels], &mut planar_out[..channels]);
            let planar_out = planar_out.map(|s| &*s);

            interleave_i16(
                &planar_out[..channels],
                &mut output[written * channels..],
                produced,
                &mut self.ditherer,
            );
            written += produced;
        }

        self.input_scratch = in_buf;
        self.output_scratch = out_buf;
        written
    }

    /// Resample interleaved 16-bit audio into a new buffer.
    ///
    /// # Panics
    ///
    /// Panics if `input.len()` is not a multiple of the channel count.
    pub fn render_to_vec(&mut self, input: &[i16]) -> Vec<i16> {
        let frames = input.len() / self.channels;
        let mut output = vec![0; self.stride.max_output(frames) * self.channels];
        let written = self.render(input, &mut output);
        output.truncate(written * self.channels);
        output
    }
}

/// Borrow each scratch channel, truncated to at most `len` frames.
fn channel_slices(bufs: &mut [Vec<f32>; MAX_CHANNELS], len: usize) -> [&mut [f32]; MAX_CHANNELS] {
    bufs.each_mut().map(|buf| {
        let n = len.min(buf.len());
        &mut buf[..n]
    })
}
