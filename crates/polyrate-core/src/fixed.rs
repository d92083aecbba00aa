//! Q32.32 fixed-point positions.
//!
//! Fractional sample positions are tracked in fixed point so that stepping
//! through millions of frames never accumulates floating-point drift. The
//! integer part selects an input frame, the fractional part selects a filter
//! phase (and the blend between two neighbouring phases).
//!
//! ```rust
//! use polyrate_core::Q32;
//!
//! let step = Q32::from_ratio(44_100, 48_000);
//! let mut pos = Q32::ZERO;
//! for _ in 0..48_000 {
//!     pos += step;
//! }
//! // One second of output consumes (just under) one second of input.
//! assert_eq!(pos.integer(), 44_099);
//! ```

use core::ops::{Add, AddAssign, Div, Sub, SubAssign};

/// Number of fractional bits.
pub const FRAC_BITS: u32 = 32;

/// Scale factor from a raw 32-bit fraction to `[0.0, 1.0)`.
const Q32_TO_FLOAT: f32 = 1.0 / (1u64 << FRAC_BITS) as f32;

/// Unsigned 64-bit fixed-point value with 32 integer and 32 fractional bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Q32(u64);

impl Q32 {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Create from raw bits.
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bits.
    #[inline]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Create an integral value.
    #[inline]
    pub const fn from_int(n: u32) -> Self {
        Self((n as u64) << FRAC_BITS)
    }

    /// `num / den` rounded toward zero.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    #[inline]
    pub const fn from_ratio(num: u32, den: u32) -> Self {
        Self(((num as u64) << FRAC_BITS) / den as u64)
    }

    /// Integer part.
    #[inline]
    pub const fn integer(self) -> usize {
        (self.0 >> FRAC_BITS) as usize
    }

    /// Fractional part as raw 32-bit value.
    #[inline]
    pub const fn fraction(self) -> u32 {
        self.0 as u32
    }

    /// Fractional part in `[0.0, 1.0)`.
    #[inline]
    pub fn fraction_f32(self) -> f32 {
        self.fraction() as f32 * Q32_TO_FLOAT
    }
}

impl Add for Q32 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Q32 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Q32 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Q32 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Div<u64> for Q32 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: u64) -> Self {
        Self(self.0 / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_fraction_split() {
        let q = Q32::from_bits((7 << 32) | 0x8000_0000);
        assert_eq!(q.integer(), 7);
        assert_eq!(q.fraction(), 0x8000_0000);
        assert_eq!(q.fraction_f32(), 0.5);
    }

    #[test]
    fn from_ratio_is_exact_for_powers_of_two() {
        assert_eq!(Q32::from_ratio(1, 4).to_bits(), 1 << 30);
        assert_eq!(Q32::from_ratio(3, 1), Q32::from_int(3));
    }

    #[test]
    fn subtracting_whole_frames_keeps_fraction() {
        let mut q = Q32::from_ratio(5, 2);
        q -= Q32::from_int(2);
        assert_eq!(q.integer(), 0);
        assert_eq!(q.fraction_f32(), 0.5);
    }

    #[test]
    fn halving_a_step() {
        let step = Q32::from_int(3);
        assert_eq!((step / 2).to_bits(), 3 << 31);
    }
}
