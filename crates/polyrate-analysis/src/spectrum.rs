//! Spectral analysis utilities

use crate::fft::{Fft, Window};

/// Compute magnitude spectrum from time-domain signal
pub fn magnitude_spectrum(signal: &[f32], fft_size: usize, window: Window) -> Vec<f32> {
    let fft = Fft::new(fft_size);

    let mut windowed = signal.to_vec();
    windowed.resize(fft_size, 0.0);
    window.apply(&mut windowed);

    let spectrum = fft.forward(&windowed);
    spectrum.iter().map(|c| c.norm()).collect()
}

/// Compute power spectrum (magnitude squared) in dB
pub fn power_spectrum_db(signal: &[f32], fft_size: usize, window: Window) -> Vec<f32> {
    let mag = magnitude_spectrum(signal, fft_size, window);
    mag.iter()
        .map(|&m| 10.0 * (m * m).max(1e-20).log10())
        .collect()
}

/// Index of the largest bin, or `None` for an empty spectrum
pub fn peak_bin(spectrum: &[f32]) -> Option<usize> {
    spectrum
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
}

/// Center frequency of `bin` in Hz
pub fn bin_frequency(bin: usize, fft_size: usize, sample_rate: f32) -> f32 {
    bin as f32 * sample_rate / fft_size as f32
}

/// Bin nearest to `freq` in Hz
pub fn frequency_bin(freq: f32, fft_size: usize, sample_rate: f32) -> usize {
    (freq * fft_size as f32 / sample_rate).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, rate: f32, n: usize) -> Vec<f32> {
        (0..n).map(|i| (2.0 * PI * freq * i as f32 / rate).sin()).collect()
    }

    #[test]
    fn test_peak_bin_tracks_tone() {
        let rate = 48_000.0;
        let signal = sine(3000.0, rate, 4096);
        let spectrum = magnitude_spectrum(&signal, 4096, Window::Hann);
        let peak = peak_bin(&spectrum).unwrap();
        assert_eq!(peak, frequency_bin(3000.0, 4096, rate));
        assert!((bin_frequency(peak, 4096, rate) - 3000.0).abs() < rate / 4096.0);
    }

    #[test]
    fn test_power_spectrum_floor_is_finite() {
        let spectrum = power_spectrum_db(&[0.0; 64], 64, Window::BlackmanHarris);
        assert_eq!(spectrum.len(), 33);
        assert!(spectrum.iter().all(|db| db.is_finite()));
    }

    #[test]
    fn test_peak_bin_empty() {
        assert_eq!(peak_bin(&[]), None);
    }
}
