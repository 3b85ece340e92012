//! BLAS Level 1: vector-vector operations.
//!
//! `axpy`, `scal` and `copy` are element-wise and round once per element.
//! `dot` is the classic running-sum baseline; `fdp` and friends accumulate
//! the exact products in a quire and round once at the end.

use crate::Vector;
use crate::accumulate::{Accumulation, Accumulator, with_accumulator};
use crate::precision::Precision;
use crate::quire::Quire;

#[inline]
fn check_strided(name: &str, len: usize, n: usize, inc: usize) {
    assert!(inc > 0, "{name}: stride must be positive");
    assert!(
        n == 0 || (n - 1) * inc < len,
        "{name}: {n} elements with stride {inc} exceed length {len}"
    );
}

// ============================================================================
// AXPY / SCAL / COPY
// ============================================================================

/// `y[i*incy] += a * x[i*incx]` for `i in 0..n`
pub fn axpy<T: Precision>(n: usize, a: T, x: &Vector<T>, incx: usize, y: &mut Vector<T>, incy: usize) {
    check_strided("axpy x", x.len(), n, incx);
    check_strided("axpy y", y.len(), n, incy);
    for i in 0..n {
        y[[i * incy]] += a * x[[i * incx]];
    }
}

/// `x[i*incx] *= a` for `i in 0..n`
pub fn scal<T: Precision>(n: usize, a: T, x: &mut Vector<T>, incx: usize) {
    check_strided("scal", x.len(), n, incx);
    for i in 0..n {
        x[[i * incx]] *= a;
    }
}

/// `y[i*incy] = x[i*incx]` for `i in 0..n`
pub fn copy<T: Precision>(n: usize, x: &Vector<T>, incx: usize, y: &mut Vector<T>, incy: usize) {
    check_strided("copy x", x.len(), n, incx);
    check_strided("copy y", y.len(), n, incy);
    for i in 0..n {
        y[[i * incy]] = x[[i * incx]];
    }
}

// ============================================================================
// DOT: inner products
// ============================================================================

pub(crate) fn dot_in<T: Precision, A: Accumulator<T>>(
    mut acc: A,
    n: usize,
    x: &Vector<T>,
    incx: usize,
    y: &Vector<T>,
    incy: usize,
) -> T {
    for i in 0..n {
        acc.add_product(x[[i * incx]], y[[i * incy]]);
    }
    acc.to_value()
}

/// Classic strided dot product; rounds after every multiply and add
pub fn dot<T: Precision>(n: usize, x: &Vector<T>, incx: usize, y: &Vector<T>, incy: usize) -> T {
    check_strided("dot x", x.len(), n, incx);
    check_strided("dot y", y.len(), n, incy);
    let mut sum = T::zero();
    for i in 0..n {
        sum = sum + x[[i * incx]] * y[[i * incy]];
    }
    sum
}

/// Accumulate the strided products `x[i*incx] * y[i*incy]` into `quire` without rounding
pub fn fdp_qc<T: Precision>(
    quire: &mut Quire<T>,
    n: usize,
    x: &Vector<T>,
    incx: usize,
    y: &Vector<T>,
    incy: usize,
) {
    check_strided("fdp_qc x", x.len(), n, incx);
    check_strided("fdp_qc y", y.len(), n, incy);
    for i in 0..n {
        quire.add_product(x[[i * incx]], y[[i * incy]]);
    }
}

/// Fused strided dot product, rounded once
pub fn fdp_stride<T: Precision>(n: usize, x: &Vector<T>, incx: usize, y: &Vector<T>, incy: usize) -> T {
    let mut quire = Quire::new();
    fdp_qc(&mut quire, n, x, incx, y, incy);
    quire.to_value()
}

/// Fused dot product of two equal-length vectors, rounded once.
///
/// The result is the correctly rounded exact inner product, independent of
/// the order in which the element pairs are visited.
pub fn fdp<T: Precision>(x: &Vector<T>, y: &Vector<T>) -> T {
    assert_eq!(x.len(), y.len(), "fdp: vector lengths differ");
    fdp_stride(x.len(), x, 1, y, 1)
}

/// Dot product of two equal-length vectors with the chosen accumulation
pub fn dot_with<T: Precision>(x: &Vector<T>, y: &Vector<T>, accumulation: Accumulation) -> T {
    assert_eq!(x.len(), y.len(), "dot_with: vector lengths differ");
    with_accumulator!(accumulation, acc => dot_in(acc, x.len(), x, 1, y, 1))
}
