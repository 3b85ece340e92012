//! Scalar capability set consumed by the reproducible BLAS layer
//!
//! A scalar must support ordinary arithmetic (through `num_traits::Float`),
//! report its bit-width and exponent-field-width, and expose an exact
//! decomposition into `(sign, significand, exponent)` so that products can be
//! accumulated without rounding. IEEE `f32` and `f64` implement the trait.

use std::fmt::{Debug, Display};

/// Trait for scalar types used by the classic and fused kernels
pub trait Precision:
    num_traits::Float
    + Debug
    + Display
    + Default
    + std::ops::AddAssign
    + std::ops::SubAssign
    + std::ops::MulAssign
    + std::ops::DivAssign
    + Send
    + Sync
    + 'static
{
    /// Total encoding width in bits
    const NBITS: u32;
    /// Width of the exponent field in bits
    const ES: u32;
    /// Stored fraction bits (hidden bit excluded)
    const FRACTION_BITS: u32 = Self::NBITS - 1 - Self::ES;

    /// Round an `f64` into this type
    fn round_from_f64(x: f64) -> Self;

    /// Exact decomposition `value = (-1)^negative * significand * 2^exponent`.
    ///
    /// Returns `None` for NaN and infinities.
    fn decompose(self) -> Option<(bool, u64, i32)>;

    /// Build the value `(-1)^negative * significand * 2^exponent`.
    ///
    /// The value must already be representable (rounded to the type's
    /// precision); magnitudes beyond the finite range become infinities.
    fn compose(negative: bool, significand: u64, exponent: i32) -> Self;

    /// Exponent bias of the encoding
    fn bias() -> i32 {
        (1i32 << (Self::ES - 1)) - 1
    }

    /// Exponent of the least significant bit of the smallest subnormal
    fn min_exponent() -> i32 {
        1 - Self::bias() - Self::FRACTION_BITS as i32
    }
}

/// Split an IEEE-754 bit pattern of width `nbits` with `es` exponent bits.
fn ieee_decompose(bits: u64, nbits: u32, es: u32) -> Option<(bool, u64, i32)> {
    let fraction_bits = nbits - 1 - es;
    let bias = (1i32 << (es - 1)) - 1;
    let negative = (bits >> (nbits - 1)) & 1 == 1;
    let exp_mask = (1u64 << es) - 1;
    let exp_field = (bits >> fraction_bits) & exp_mask;
    let fraction = bits & ((1u64 << fraction_bits) - 1);

    if exp_field == exp_mask {
        return None;
    }
    if exp_field == 0 {
        Some((negative, fraction, 1 - bias - fraction_bits as i32))
    } else {
        let significand = fraction | (1u64 << fraction_bits);
        Some((negative, significand, exp_field as i32 - bias - fraction_bits as i32))
    }
}

/// Assemble an IEEE-754 bit pattern from an exactly representable value.
fn ieee_compose(negative: bool, mut significand: u64, mut exponent: i32, nbits: u32, es: u32) -> u64 {
    let fraction_bits = nbits - 1 - es;
    let bias = (1i32 << (es - 1)) - 1;
    let sign = if negative { 1u64 << (nbits - 1) } else { 0 };
    let exp_max = (1u64 << es) - 1;
    let hidden = 1u64 << fraction_bits;
    let min_exponent = 1 - bias - fraction_bits as i32;

    if significand == 0 {
        return sign;
    }

    // Only zero bits are dropped here when the value is representable.
    while significand >= hidden << 1 {
        significand >>= 1;
        exponent += 1;
    }
    while significand < hidden && exponent > min_exponent {
        significand <<= 1;
        exponent -= 1;
    }

    if significand < hidden {
        // subnormal
        return sign | significand;
    }

    let biased = exponent as i64 + fraction_bits as i64 + bias as i64;
    if biased >= exp_max as i64 {
        return sign | (exp_max << fraction_bits);
    }
    sign | ((biased as u64) << fraction_bits) | (significand & (hidden - 1))
}

impl Precision for f64 {
    const NBITS: u32 = 64;
    const ES: u32 = 11;

    #[inline]
    fn round_from_f64(x: f64) -> f64 {
        x
    }

    fn decompose(self) -> Option<(bool, u64, i32)> {
        ieee_decompose(self.to_bits(), Self::NBITS, Self::ES)
    }

    fn compose(negative: bool, significand: u64, exponent: i32) -> f64 {
        f64::from_bits(ieee_compose(negative, significand, exponent, Self::NBITS, Self::ES))
    }
}

impl Precision for f32 {
    const NBITS: u32 = 32;
    const ES: u32 = 8;

    #[inline]
    fn round_from_f64(x: f64) -> f32 {
        x as f32
    }

    fn decompose(self) -> Option<(bool, u64, i32)> {
        ieee_decompose(self.to_bits() as u64, Self::NBITS, Self::ES)
    }

    fn compose(negative: bool, significand: u64, exponent: i32) -> f32 {
        f32::from_bits(ieee_compose(negative, significand, exponent, Self::NBITS, Self::ES) as u32)
    }
}
