//! Quire to scalar conversion (the single rounding step)

use dashu_int::ops::BitTest;
use dashu_int::{IBig, UBig};

use crate::precision::Precision;

/// Split a fixed-point value into sign and magnitude
pub(super) fn sign_magnitude(fixed: &IBig) -> (bool, UBig) {
    let negative = fixed < &IBig::ZERO;
    let abs = if negative {
        IBig::ZERO - fixed
    } else {
        fixed.clone()
    };
    (negative, UBig::try_from(abs).unwrap_or(UBig::ZERO))
}

/// Round `fixed * 2^-radix` to the nearest `T`, ties to even.
///
/// Results below the normal range keep only the bits the subnormal encoding
/// can hold; results beyond the finite range become infinities.
pub(super) fn round_fixed<T: Precision>(fixed: &IBig, radix: usize) -> T {
    let (negative, magnitude) = sign_magnitude(fixed);
    let len = magnitude.bit_len();
    if len == 0 {
        return T::zero();
    }

    let radix = radix as i64;
    let leading = len as i64 - 1 - radix;
    let lsb = (leading - T::FRACTION_BITS as i64).max(T::min_exponent() as i64);
    // lsb >= min_exponent = -radix / 2, so at least radix / 2 bits are dropped
    let dropped = (lsb + radix) as usize;

    let mut kept = &magnitude >> dropped;
    if magnitude.bit(dropped - 1) {
        let sticky = magnitude
            .trailing_zeros()
            .is_some_and(|tz| tz < dropped - 1);
        if sticky || kept.bit(0) {
            kept += UBig::ONE;
        }
    }

    let Ok(significand) = u64::try_from(kept) else {
        return if negative {
            T::neg_infinity()
        } else {
            T::infinity()
        };
    };
    T::compose(negative, significand, lsb as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_from(value: i64, shift: usize) -> IBig {
        IBig::from(value) << shift
    }

    #[test]
    fn test_sign_magnitude() {
        let (neg, mag) = sign_magnitude(&IBig::from(-12));
        assert!(neg);
        assert_eq!(mag, UBig::from(12u8));

        let (neg, mag) = sign_magnitude(&IBig::ZERO);
        assert!(!neg);
        assert_eq!(mag.bit_len(), 0);
    }

    #[test]
    fn test_round_integers() {
        let radix = 2148;
        assert_eq!(round_fixed::<f64>(&fixed_from(5, radix), radix), 5.0);
        assert_eq!(round_fixed::<f64>(&fixed_from(-7, radix), radix), -7.0);
        assert_eq!(round_fixed::<f32>(&fixed_from(3, 298), 298), 3.0f32);
    }

    #[test]
    fn test_round_carries_into_next_binade() {
        // 2^53 - 1 + 1/2 rounds up to 2^53 for f64 (tie, odd kept)
        let radix = 2148;
        let value = (IBig::from((1u64 << 54) - 1)) << (radix - 1);
        assert_eq!(round_fixed::<f64>(&value, radix), 9007199254740992.0);
    }
}
