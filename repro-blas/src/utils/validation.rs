//! Result validation utilities

use crate::accumulate::{Accumulation, Accumulator, with_accumulator};
use crate::precision::Precision;
use crate::{Matrix, Vector};

/// Check `a[i][j] == a[j][i]` to within `tolerance`
pub fn is_symmetric<T: Precision>(a: &Matrix<T>, tolerance: T) -> bool {
    let (m, n) = *a.shape();
    if m != n {
        return false;
    }
    for i in 0..n {
        for j in (i + 1)..n {
            if (a[[i, j]] - a[[j, i]]).abs() > tolerance {
                return false;
            }
        }
    }
    true
}

/// Check that every entry above the diagonal is exactly zero
pub fn is_lower_triangular<T: Precision>(a: &Matrix<T>) -> bool {
    let (m, n) = *a.shape();
    for i in 0..m {
        for j in (i + 1)..n {
            if a[[i, j]] != T::zero() {
                return false;
            }
        }
    }
    true
}

/// Largest element-wise `|a - b|`
pub fn max_abs_difference<T: Precision>(a: &Matrix<T>, b: &Matrix<T>) -> T {
    assert_eq!(a.shape(), b.shape(), "max_abs_difference: shapes differ");
    let mut max_diff = T::zero();
    for (&x, &y) in a.iter().zip(b.iter()) {
        let diff = (x - y).abs();
        if diff > max_diff || diff.is_nan() {
            max_diff = diff;
        }
    }
    max_diff
}

fn relative_error_in<T: Precision, A: Accumulator<T>>(mut acc: A, x: &Vector<T>, x_ref: &Vector<T>) -> T {
    for (&xi, &ri) in x.iter().zip(x_ref.iter()) {
        let diff = xi - ri;
        acc.add_product(diff, diff);
    }
    let num = acc.to_value().sqrt();

    acc.reset();
    for &ri in x_ref.iter() {
        acc.add_product(ri, ri);
    }
    let den = acc.to_value().sqrt();

    if den == T::zero() { num } else { num / den }
}

/// `||x - x_ref||_2 / ||x_ref||_2`, or the absolute error when `x_ref` is zero
pub fn relative_error<T: Precision>(x: &Vector<T>, x_ref: &Vector<T>, accumulation: Accumulation) -> T {
    assert_eq!(x.len(), x_ref.len(), "relative_error: vector lengths differ");
    with_accumulator!(accumulation, acc => relative_error_in(acc, x, x_ref))
}

/// Validate a compact Crout factor.
///
/// Rebuilds `L * U` with exact accumulation and checks it against the
/// original to within `tolerance`.
pub fn validate_crout<T: Precision>(original: &Matrix<T>, lu: &Matrix<T>, tolerance: T) -> bool {
    let (n, cols) = *original.shape();
    if n != cols || *lu.shape() != (n, n) {
        return false;
    }

    let mut acc = crate::quire::Quire::new();
    for i in 0..n {
        for j in 0..n {
            acc.reset();
            // L[i][p] nonzero for p <= i, U[p][j] nonzero for p <= j
            for p in 0..=i.min(j) {
                let u = if p == j { T::one() } else { lu[[p, j]] };
                acc.add_product(lu[[i, p]], u);
            }
            if (acc.to_value() - original[[i, j]]).abs() > tolerance {
                return false;
            }
        }
    }
    true
}

/// Validate a lower Cholesky factor.
///
/// Checks that `l` is lower triangular with a positive diagonal and that
/// `L * L^T` reproduces the original to within `tolerance`.
pub fn validate_cholesky<T: Precision>(original: &Matrix<T>, l: &Matrix<T>, tolerance: T) -> bool {
    let (n, cols) = *original.shape();
    if n != cols || *l.shape() != (n, n) {
        return false;
    }
    if !is_lower_triangular(l) {
        return false;
    }
    for i in 0..n {
        if !(l[[i, i]] > T::zero()) {
            return false;
        }
    }

    let mut acc = crate::quire::Quire::new();
    for i in 0..n {
        for j in 0..=i {
            acc.reset();
            for p in 0..=j {
                acc.add_product(l[[i, p]], l[[j, p]]);
            }
            let value = acc.to_value();
            if (value - original[[i, j]]).abs() > tolerance || (value - original[[j, i]]).abs() > tolerance {
                return false;
            }
        }
    }
    true
}
