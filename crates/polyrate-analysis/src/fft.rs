//! FFT wrapper with windowing functions

use rustfft::{FftPlanner, num_complex::Complex};
use std::f64::consts::PI;
use std::sync::Arc;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Rectangular (no windowing)
    Rectangular,
    /// Hann window (raised cosine)
    Hann,
    /// 4-term Blackman-Harris window (-92 dB sidelobes)
    BlackmanHarris,
}

impl Window {
    /// Main-lobe half width in bins.
    pub fn main_lobe_bins(&self) -> usize {
        match self {
            Window::Rectangular => 1,
            Window::Hann => 2,
            Window::BlackmanHarris => 4,
        }
    }

    /// Window value at index `i` of `n` (periodic form).
    fn value(&self, i: usize, n: usize) -> f32 {
        let x = 2.0 * PI * i as f64 / n as f64;
        let w = match self {
            Window::Rectangular => 1.0,
            Window::Hann => 0.5 * (1.0 - x.cos()),
            Window::BlackmanHarris => {
                0.35875 - 0.48829 * x.cos() + 0.14128 * (2.0 * x).cos() - 0.01168 * (3.0 * x).cos()
            }
        };
        w as f32
    }

    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f32]) {
        if *self == Window::Rectangular {
            return;
        }
        let n = buffer.len();
        for (i, sample) in buffer.iter_mut().enumerate() {
            *sample *= self.value(i, n);
        }
    }

    /// Get window coefficients
    pub fn coefficients(&self, size: usize) -> Vec<f32> {
        let mut coeffs = vec![1.0; size];
        self.apply(&mut coeffs);
        coeffs
    }
}

/// Planned forward FFT of a fixed size
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
}

impl Fft {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            fft: planner.plan_fft_forward(size),
            size,
        }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Perform forward FFT on real input
    ///
    /// Input is zero padded or truncated to the FFT size. Returns
    /// `size / 2 + 1` bins (DC to Nyquist).
    pub fn forward(&self, input: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer: Vec<Complex<f32>> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer.truncate(self.size / 2 + 1);
        buffer
    }
}
