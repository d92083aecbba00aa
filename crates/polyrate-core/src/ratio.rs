//! Rate ratio reduction, mode selection and buffer-size queries.
//!
//! A conversion from `input_rate` to `output_rate` is reduced to the
//! fraction `up / down = output_rate / input_rate`. When `up` is small the
//! resampler walks an exact table of per-phase input steps (rational mode).
//! When it is not, the phase count is capped at [`IRRATIONAL_PHASES`] and the
//! position advances by a Q32 step instead (irrational mode).
//!
//! The rate queries answer "how many frames will this produce / require"
//! from the ratio alone, without running a filter:
//!
//! ```rust
//! use polyrate_core::Stride;
//!
//! let stride = Stride::new(44_100, 48_000);
//! assert_eq!(stride.up_factor(), 160);
//! assert_eq!(stride.down_factor(), 147);
//! assert_eq!(stride.max_output(1000), (1000 * 160 + 146) / 147);
//! ```

use crate::fixed::{FRAC_BITS, Q32};

/// Largest reduced up factor still handled with an exact step table.
pub const RATIONAL_PHASE_LIMIT: u32 = 640;

/// Bits of the Q32 fraction used to select an irrational-mode phase.
pub const PHASE_BITS: u32 = 8;

/// Number of filter phases in irrational mode.
pub const IRRATIONAL_PHASES: u32 = 1 << PHASE_BITS;

/// Greatest common divisor of two positive integers.
///
/// # Panics
///
/// Panics in debug builds if either argument is zero.
pub fn gcd(mut a: u32, mut b: u32) -> u32 {
    debug_assert!(a > 0 && b > 0, "gcd of zero is undefined");
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// How the resampler advances through its filter phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleMode {
    /// Exact per-phase integer stepping over `up_factor` phases.
    Rational,
    /// Q32 stepping over [`IRRATIONAL_PHASES`] interpolated phases.
    Irrational,
}

impl core::fmt::Display for ResampleMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Rational => write!(f, "rational"),
            Self::Irrational => write!(f, "irrational"),
        }
    }
}

/// A sample-rate pair reduced to its smallest fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateRatio {
    /// Input sample rate in Hz.
    pub input_rate: u32,
    /// Output sample rate in Hz.
    pub output_rate: u32,
    /// `output_rate / gcd`.
    pub up_factor: u32,
    /// `input_rate / gcd`.
    pub down_factor: u32,
}

impl RateRatio {
    /// Reduce a rate pair.
    ///
    /// # Panics
    ///
    /// Panics if either rate is zero.
    pub fn new(input_rate: u32, output_rate: u32) -> Self {
        assert!(input_rate > 0 && output_rate > 0, "sample rates must be positive");
        let divisor = gcd(input_rate, output_rate);
        Self {
            input_rate,
            output_rate,
            up_factor: output_rate / divisor,
            down_factor: input_rate / divisor,
        }
    }

    /// Mode this ratio resolves to.
    pub fn mode(&self) -> ResampleMode {
        if self.up_factor > RATIONAL_PHASE_LIMIT {
            ResampleMode::Irrational
        } else {
            ResampleMode::Rational
        }
    }
}

/// A resolved conversion stride: phase count, input stride and, in
/// irrational mode, the Q32 step per output frame.
///
/// This is what the filter designer and the streaming kernel are built
/// from, and what the buffer-size queries are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stride {
    ratio: RateRatio,
    up_factor: u32,
    down_factor: u32,
    step: Option<Q32>,
}

impl Stride {
    /// Resolve a rate pair.
    ///
    /// # Panics
    ///
    /// Panics if either rate is zero.
    pub fn new(input_rate: u32, output_rate: u32) -> Self {
        Self::from_ratio(RateRatio::new(input_rate, output_rate))
    }

    /// Resolve an already reduced ratio.
    pub fn from_ratio(ratio: RateRatio) -> Self {
        match ratio.mode() {
            ResampleMode::Rational => Self {
                ratio,
                up_factor: ratio.up_factor,
                down_factor: ratio.down_factor,
                step: None,
            },
            ResampleMode::Irrational => Self {
                ratio,
                up_factor: IRRATIONAL_PHASES,
                down_factor: ((u64::from(IRRATIONAL_PHASES) * u64::from(ratio.input_rate))
                    / u64::from(ratio.output_rate)) as u32,
                step: Some(Q32::from_ratio(ratio.input_rate, ratio.output_rate)),
            },
        }
    }

    /// The reduced rate pair.
    pub fn ratio(&self) -> RateRatio {
        self.ratio
    }

    /// Resampling mode.
    pub fn mode(&self) -> ResampleMode {
        if self.step.is_some() {
            ResampleMode::Irrational
        } else {
            ResampleMode::Rational
        }
    }

    /// Number of filter phases.
    pub fn up_factor(&self) -> u32 {
        self.up_factor
    }

    /// Input frames consumed per `up_factor` output frames (truncated in
    /// irrational mode).
    pub fn down_factor(&self) -> u32 {
        self.down_factor
    }

    /// Q32 input advance per output frame (irrational mode only).
    pub fn step(&self) -> Option<Q32> {
        self.step
    }

    /// Fewest output frames `input_frames` can produce.
    pub fn min_output(&self, input_frames: usize) -> usize {
        let n = input_frames as u128;
        to_frames(match self.step {
            None => n * u128::from(self.up_factor) / u128::from(self.down_factor),
            Some(step) => (n << FRAC_BITS) / u128::from(step.to_bits()),
        })
    }

    /// Most output frames `input_frames` can produce.
    pub fn max_output(&self, input_frames: usize) -> usize {
        let n = input_frames as u128;
        to_frames(match self.step {
            None => (n * u128::from(self.up_factor)).div_ceil(u128::from(self.down_factor)),
            Some(step) => (n << FRAC_BITS).div_ceil(u128::from(step.to_bits())),
        })
    }

    /// Fewest input frames guaranteed to produce at least `output_frames`.
    pub fn min_input(&self, output_frames: usize) -> usize {
        let n = output_frames as u128;
        to_frames(match self.step {
            None => (n * u128::from(self.down_factor)).div_ceil(u128::from(self.up_factor)),
            Some(step) => (n * u128::from(step.to_bits()) + 0xffff_ffff) >> FRAC_BITS,
        })
    }

    /// Most input frames that produce at most `output_frames`.
    pub fn max_input(&self, output_frames: usize) -> usize {
        let n = output_frames as u128;
        to_frames(match self.step {
            None => n * u128::from(self.down_factor) / u128::from(self.up_factor),
            Some(step) => (n * u128::from(step.to_bits())) >> FRAC_BITS,
        })
    }
}

/// Narrow a frame count computed in 128 bits.
///
/// # Panics
///
/// Panics if the count does not fit in `usize`.
fn to_frames(frames: u128) -> usize {
    usize::try_from(frames).unwrap_or_else(|_| panic!("frame count {frames} does not fit in usize"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd_of_common_rates() {
        assert_eq!(gcd(44_100, 48_000), 300);
        assert_eq!(gcd(48_000, 24_000), 24_000);
        assert_eq!(gcd(7, 13), 1);
        assert_eq!(gcd(5, 5), 5);
    }

    #[test]
    fn cd_to_dvd_is_rational() {
        let stride = Stride::new(44_100, 48_000);
        assert_eq!(stride.mode(), ResampleMode::Rational);
        assert_eq!(stride.up_factor(), 160);
        assert_eq!(stride.down_factor(), 147);
        assert!(stride.step().is_none());
    }

    #[test]
    fn halving_is_rational_one_over_two() {
        let stride = Stride::new(48_000, 24_000);
        assert_eq!(stride.up_factor(), 1);
        assert_eq!(stride.down_factor(), 2);
        assert_eq!(stride.min_output(480), 240);
        assert_eq!(stride.max_output(480), 240);
    }

    #[test]
    fn large_up_factor_falls_back_to_irrational() {
        // gcd(44100, 44101) == 1
        let stride = Stride::new(44_100, 44_101);
        assert_eq!(stride.mode(), ResampleMode::Irrational);
        assert_eq!(stride.up_factor(), IRRATIONAL_PHASES);
        assert_eq!(stride.down_factor(), 255);
        assert_eq!(stride.step(), Some(Q32::from_ratio(44_100, 44_101)));
    }

    #[test]
    fn phase_limit_boundary() {
        // up = 640 exactly stays rational
        assert_eq!(Stride::new(641, 640).mode(), ResampleMode::Rational);
        assert_eq!(Stride::new(640, 641).mode(), ResampleMode::Irrational);
    }

    #[test]
    fn bounds_bracket_exact_ratio() {
        let stride = Stride::new(44_100, 48_000);
        for n in [0usize, 1, 146, 147, 148, 1000, 44_100] {
            let exact = n as f64 * 160.0 / 147.0;
            assert!(stride.min_output(n) as f64 <= exact);
            assert!(stride.max_output(n) as f64 >= exact);
            assert!(stride.max_output(n) - stride.min_output(n) <= 1);
        }
    }

    #[test]
    fn irrational_bounds_bracket_exact_ratio() {
        let stride = Stride::new(44_100, 44_101);
        for n in [1usize, 100, 4410, 44_100] {
            let min = stride.min_output(n);
            let max = stride.max_output(n);
            assert!(max - min <= 1, "n={n}: min={min} max={max}");
            let exact = n as f64 * 44_101.0 / 44_100.0;
            assert!((min as f64) <= exact + 1.0 && (max as f64) >= exact - 1.0);
        }
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn queries_hold_for_hours_of_audio() {
        // 2^30 frames overflows a 64-bit product with a Q32 step near 4.35.
        let n = 1usize << 30;
        let stride = Stride::new(192_000, 44_101);
        assert_eq!(stride.mode(), ResampleMode::Irrational);

        let exact = n as f64 * 192_000.0 / 44_101.0;
        let min_in = stride.min_input(n);
        let max_in = stride.max_input(n);
        assert!((min_in as f64 - exact).abs() <= 2.0, "min_input {min_in} vs {exact}");
        assert!(max_in <= min_in && min_in - max_in <= 1);
        assert!(stride.max_output(min_in) >= n);
        assert!(stride.min_output(max_in) <= n);

        let up = Stride::new(44_101, 192_000);
        let exact = n as f64 * 192_000.0 / 44_101.0;
        assert!((up.max_output(n) as f64 - exact).abs() <= 2.0);
        assert!(up.max_output(n) - up.min_output(n) <= 1);

        let rational = Stride::new(44_100, 48_000);
        assert_eq!(rational.max_output(usize::MAX / 2), (usize::MAX / 2) / 147 * 160 + ((usize::MAX / 2) % 147 * 160).div_ceil(147));
    }

    #[test]
    #[should_panic(expected = "does not fit in usize")]
    fn unrepresentable_output_count_panics() {
        Stride::new(44_100, 44_101).max_output(usize::MAX);
    }

    #[test]
    fn mode_displays_lowercase() {
        assert_eq!(ResampleMode::Rational.to_string(), "rational");
        assert_eq!(ResampleMode::Irrational.to_string(), "irrational");
    }
}
