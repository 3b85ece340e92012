//! Accumulation strategies
//!
//! Every reduction in the crate (inner products, matrix-vector rows,
//! matrix-matrix cells, factorization sums, norms) is written once against
//! the [`Accumulator`] trait and instantiated with either
//!
//! - [`ScalarSum`]: ordinary arithmetic, rounding after every term, or
//! - [`Quire`]: exact accumulation, rounding once on conversion.
//!
//! Callers pick one at runtime with [`Accumulation`].

use crate::precision::Precision;
use crate::quire::{ArithmeticError, Quire, DEFAULT_CAPACITY};

/// Running sum used by every reduction kernel
pub trait Accumulator<T: Precision>: Clone + Send {
    /// Clear to zero
    fn reset(&mut self);

    /// `self += a * b`
    fn add_product(&mut self, a: T, b: T);

    /// `self -= a * b`
    fn sub_product(&mut self, a: T, b: T);

    /// `self += a`
    fn add_value(&mut self, a: T);

    /// `self -= a`
    fn sub_value(&mut self, a: T);

    fn is_zero(&self) -> bool;

    /// Current value as a scalar
    fn to_value(&self) -> T;

    /// Current value, with arithmetic signals surfaced as errors
    fn try_to_value(&self) -> Result<T, ArithmeticError>;
}

/// Classic accumulator: a scalar rounded after every operation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScalarSum<T: Precision> {
    sum: T,
}

impl<T: Precision> ScalarSum<T> {
    pub fn new() -> Self {
        Self { sum: T::zero() }
    }
}

impl<T: Precision> Accumulator<T> for ScalarSum<T> {
    #[inline]
    fn reset(&mut self) {
        self.sum = T::zero();
    }

    #[inline]
    fn add_product(&mut self, a: T, b: T) {
        self.sum += a * b;
    }

    #[inline]
    fn sub_product(&mut self, a: T, b: T) {
        self.sum -= a * b;
    }

    #[inline]
    fn add_value(&mut self, a: T) {
        self.sum += a;
    }

    #[inline]
    fn sub_value(&mut self, a: T) {
        self.sum -= a;
    }

    fn is_zero(&self) -> bool {
        self.sum == T::zero()
    }

    fn to_value(&self) -> T {
        self.sum
    }

    fn try_to_value(&self) -> Result<T, ArithmeticError> {
        if self.sum.is_nan() {
            Err(ArithmeticError::NotAReal)
        } else {
            Ok(self.sum)
        }
    }
}

impl<T: Precision> Accumulator<T> for Quire<T> {
    fn reset(&mut self) {
        Quire::reset(self);
    }

    fn add_product(&mut self, a: T, b: T) {
        Quire::add_product(self, a, b);
    }

    fn sub_product(&mut self, a: T, b: T) {
        Quire::sub_product(self, a, b);
    }

    fn add_value(&mut self, a: T) {
        Quire::add_value(self, a);
    }

    fn sub_value(&mut self, a: T) {
        Quire::sub_value(self, a);
    }

    fn is_zero(&self) -> bool {
        Quire::is_zero(self)
    }

    fn to_value(&self) -> T {
        Quire::to_value(self)
    }

    fn try_to_value(&self) -> Result<T, ArithmeticError> {
        Quire::try_to_value(self)
    }
}

/// Accumulation strategy selected at the public API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accumulation {
    /// Ordinary scalar arithmetic, rounding at every term
    Classic,
    /// Exact quire accumulation with `capacity` carry bits, rounding once
    Fused { capacity: u32 },
}

impl Accumulation {
    /// Fused accumulation with the default quire capacity
    pub const fn fused() -> Self {
        Accumulation::Fused {
            capacity: DEFAULT_CAPACITY,
        }
    }

    pub fn is_fused(&self) -> bool {
        matches!(self, Accumulation::Fused { .. })
    }
}

impl Default for Accumulation {
    fn default() -> Self {
        Accumulation::fused()
    }
}

/// Run `$body` with `$acc` bound to a fresh accumulator of the chosen kind.
macro_rules! with_accumulator {
    ($accumulation:expr, $acc:ident => $body:expr) => {
        match $accumulation {
            $crate::accumulate::Accumulation::Classic => {
                let $acc = $crate::accumulate::ScalarSum::new();
                $body
            }
            $crate::accumulate::Accumulation::Fused { capacity } => {
                let $acc = $crate::quire::Quire::with_capacity(capacity);
                $body
            }
        }
    };
}

pub(crate) use with_accumulator;
