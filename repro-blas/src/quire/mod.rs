//! Exact fixed-point accumulator (quire)
//!
//! A quire holds a sum of exact products of scalars as a fixed-point integer
//! scaled by `2^-radix`. The radix point sits low enough to represent the
//! product of the two smallest subnormals, and the integer part is wide
//! enough for the product of the two largest finite values plus `capacity`
//! carry bits. Nothing is rounded until [`Quire::to_value`].

mod convert;

use std::marker::PhantomData;

use dashu_int::ops::BitTest;
use dashu_int::IBig;

use crate::precision::Precision;

/// Default number of carry/cancellation bits above the product range
pub const DEFAULT_CAPACITY: u32 = 10;

/// Error types for the accumulator's single rounding step
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    #[error("Accumulated a value that is not a real number")]
    NotAReal,

    #[error("Quire overflow: exceeded {capacity} capacity bits")]
    Overflow { capacity: u32 },
}

/// Exact accumulator parameterized by the scalar's `(NBITS, ES)`
#[derive(Debug, Clone, PartialEq)]
pub struct Quire<T: Precision> {
    fixed: IBig,
    capacity: u32,
    nar: bool,
    _marker: PhantomData<T>,
}

impl<T: Precision> Default for Quire<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Precision> Quire<T> {
    /// Zero quire with [`DEFAULT_CAPACITY`] carry bits
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Zero quire with `capacity` carry bits
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            fixed: IBig::ZERO,
            capacity,
            nar: false,
            _marker: PhantomData,
        }
    }

    /// Position of the fixed point, in bits above the least significant bit
    pub fn radix() -> usize {
        (-2 * T::min_exponent()) as usize
    }

    /// Bits needed left of the fixed point for the largest finite product
    pub fn range_bits() -> usize {
        1usize << T::ES
    }

    /// Total width in bits, sign included
    pub fn width(&self) -> usize {
        1 + self.capacity as usize + Self::range_bits() + Self::radix()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Clear to zero, dropping any not-a-real state
    pub fn reset(&mut self) {
        self.fixed = IBig::ZERO;
        self.nar = false;
    }

    pub fn is_zero(&self) -> bool {
        !self.nar && self.fixed == IBig::ZERO
    }

    /// True once a NaN or infinity has been accumulated
    pub fn is_nar(&self) -> bool {
        self.nar
    }

    /// True when the magnitude no longer fits in `width() - 1` bits
    pub fn is_overflow(&self) -> bool {
        !self.nar && convert::sign_magnitude(&self.fixed).1.bit_len() >= self.width()
    }

    /// Accumulate `a * b` exactly
    pub fn add_product(&mut self, a: T, b: T) {
        self.accumulate_product(a, b, false);
    }

    /// Accumulate `-(a * b)` exactly
    pub fn sub_product(&mut self, a: T, b: T) {
        self.accumulate_product(a, b, true);
    }

    /// Accumulate `a` exactly
    pub fn add_value(&mut self, a: T) {
        self.accumulate_value(a, false);
    }

    /// Accumulate `-a` exactly
    pub fn sub_value(&mut self, a: T) {
        self.accumulate_value(a, true);
    }

    pub fn add_quire(&mut self, other: &Quire<T>) {
        self.nar |= other.nar;
        self.fixed += &other.fixed;
    }

    pub fn sub_quire(&mut self, other: &Quire<T>) {
        self.nar |= other.nar;
        self.fixed -= &other.fixed;
    }

    /// Round the exact sum to `T` once.
    ///
    /// Not-a-real and overflowed quires convert to NaN.
    pub fn to_value(&self) -> T {
        self.try_to_value().unwrap_or_else(|_| T::nan())
    }

    /// Round the exact sum to `T`, surfacing not-a-real and overflow states
    pub fn try_to_value(&self) -> Result<T, ArithmeticError> {
        if self.nar {
            return Err(ArithmeticError::NotAReal);
        }
        if self.is_overflow() {
            return Err(ArithmeticError::Overflow {
                capacity: self.capacity,
            });
        }
        Ok(convert::round_fixed::<T>(&self.fixed, Self::radix()))
    }

    fn accumulate_product(&mut self, a: T, b: T, negate: bool) {
        let (Some((neg_a, sig_a, exp_a)), Some((neg_b, sig_b, exp_b))) =
            (a.decompose(), b.decompose())
        else {
            self.nar = true;
            return;
        };
        if sig_a == 0 || sig_b == 0 {
            return;
        }
        let shift = (exp_a + exp_b) as i64 + Self::radix() as i64;
        debug_assert!(shift >= 0);
        let magnitude = IBig::from(sig_a as u128 * sig_b as u128) << shift as usize;
        if neg_a ^ neg_b ^ negate {
            self.fixed -= magnitude;
        } else {
            self.fixed += magnitude;
        }
    }

    fn accumulate_value(&mut self, a: T, negate: bool) {
        let Some((neg, sig, exp)) = a.decompose() else {
            self.nar = true;
            return;
        };
        if sig == 0 {
            return;
        }
        let shift = exp as i64 + Self::radix() as i64;
        let magnitude = IBig::from(sig) << shift as usize;
        if neg ^ negate {
            self.fixed -= magnitude;
        } else {
            self.fixed += magnitude;
        }
    }
}

impl<T: Precision> std::ops::AddAssign<&Quire<T>> for Quire<T> {
    fn add_assign(&mut self, other: &Quire<T>) {
        self.add_quire(other);
    }
}

impl<T: Precision> std::ops::SubAssign<&Quire<T>> for Quire<T> {
    fn sub_assign(&mut self, other: &Quire<T>) {
        self.sub_quire(other);
    }
}
