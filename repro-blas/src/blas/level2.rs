//! BLAS Level 2: matrix-vector operations.
//!
//! Each output element of a fused matrix-vector product is the correctly
//! rounded value of its exact row-vector inner product. Rows do not interact,
//! so one accumulator per row is all the state the kernels need.

use mdarray::Tensor;

use crate::accumulate::{Accumulation, Accumulator, with_accumulator};
use crate::config::BlasConfig;
use crate::precision::Precision;
use crate::quire::Quire;
use crate::{Matrix, Vector};

fn check_matvec<T>(name: &str, a: &Matrix<T>, x: &Vector<T>, b: &Vector<T>) {
    let (m, n) = *a.shape();
    assert_eq!(n, x.len(), "{name}: A has {n} columns but x has {} elements", x.len());
    assert_eq!(m, b.len(), "{name}: A has {m} rows but b has {} elements", b.len());
}

fn matvec_in<T: Precision, A: Accumulator<T>>(mut acc: A, a: &Matrix<T>, x: &Vector<T>, b: &mut Vector<T>) {
    let (m, n) = *a.shape();
    for i in 0..m {
        acc.reset();
        for j in 0..n {
            acc.add_product(a[[i, j]], x[[j]]);
        }
        b[[i]] = acc.to_value();
    }
}

/// Classic matrix-vector product `b = A * x`
pub fn matvec<T: Precision>(a: &Matrix<T>, x: &Vector<T>, b: &mut Vector<T>) {
    check_matvec("matvec", a, x, b);
    let (m, n) = *a.shape();
    for i in 0..m {
        let mut sum = T::zero();
        for j in 0..n {
            sum = sum + a[[i, j]] * x[[j]];
        }
        b[[i]] = sum;
    }
}

/// Fused matrix-vector product `b = A * x`, one rounding per element
pub fn fmv<T: Precision>(a: &Matrix<T>, x: &Vector<T>, b: &mut Vector<T>) {
    fmv_with_config(a, x, b, &BlasConfig::default());
}

/// Fused matrix-vector product honouring the quire capacity and trace mode.
///
/// In trace mode the rounded value is subtracted back out of each row's quire
/// and any non-zero remainder is reported. Returns the number of rows whose
/// rounding was inexact; always 0 outside trace mode.
pub fn fmv_with_config<T: Precision>(a: &Matrix<T>, x: &Vector<T>, b: &mut Vector<T>, config: &BlasConfig) -> usize {
    check_matvec("fmv", a, x, b);
    let (m, n) = *a.shape();
    let mut quire = Quire::with_capacity(config.capacity);
    let mut inexact = 0usize;
    for i in 0..m {
        quire.reset();
        for j in 0..n {
            quire.add_product(a[[i, j]], x[[j]]);
        }
        let value = quire.to_value();
        b[[i]] = value;

        if config.trace {
            quire.sub_value(value);
            if !quire.is_zero() {
                inexact += 1;
                tracing::debug!(row = i, value = %value, residual = %quire.to_value(), "fmv rounding residual");
            }
        }
    }
    if config.trace {
        tracing::debug!(rows = m, inexact, "fmv trace complete");
    }
    inexact
}

/// Matrix-vector product with the chosen accumulation
pub fn matvec_with<T: Precision>(a: &Matrix<T>, x: &Vector<T>, b: &mut Vector<T>, accumulation: Accumulation) {
    check_matvec("matvec_with", a, x, b);
    with_accumulator!(accumulation, acc => matvec_in(acc, a, x, b));
}

/// Residual `r = b - A * x` with one rounding per element
pub fn fused_residual<T: Precision>(a: &Matrix<T>, x: &Vector<T>, b: &Vector<T>) -> Vector<T> {
    check_matvec("fused_residual", a, x, b);
    let (m, n) = *a.shape();
    let mut quire = Quire::new();
    let mut r = Tensor::from_elem((m,), T::zero());
    for i in 0..m {
        quire.reset();
        quire.add_value(b[[i]]);
        for j in 0..n {
            quire.sub_product(a[[i, j]], x[[j]]);
        }
        r[[i]] = quire.to_value();
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> Matrix<f64> {
        let n = rows.first().map_or(0, |r| r.len());
        Tensor::from_fn((rows.len(), n), |idx| rows[idx[0]][idx[1]])
    }

    fn vector(values: &[f64]) -> Vector<f64> {
        Tensor::from_fn((values.len(),), |idx| values[idx[0]])
    }

    #[test]
    fn test_fmv_simple() {
        let a = matrix(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        let x = vector(&[1.0, -1.0]);
        let mut b = vector(&[0.0; 3]);
        fmv(&a, &x, &mut b);
        assert_eq!(b[[0]], -1.0);
        assert_eq!(b[[1]], -1.0);
        assert_eq!(b[[2]], -1.0);
    }

    #[test]
    fn test_fmv_avoids_cancellation() {
        let a = matrix(&[&[1e20, 1.0, -1e20]]);
        let x = vector(&[1.0, 1.0, 1.0]);
        let mut fused = vector(&[0.0]);
        let mut classic = vector(&[0.0]);
        fmv(&a, &x, &mut fused);
        matvec(&a, &x, &mut classic);
        assert_eq!(fused[[0]], 1.0);
        assert_eq!(classic[[0]], 0.0);
    }

    #[test]
    fn test_trace_mode_matches_plain() {
        let a = matrix(&[&[0.1, 0.2, 0.3], &[1.0, 2.0, 3.0]]);
        let x = vector(&[0.7, 0.11, 0.13]);
        let mut plain = vector(&[0.0; 2]);
        let mut traced = vector(&[0.0; 2]);
        fmv(&a, &x, &mut plain);
        fmv_with_config(&a, &x, &mut traced, &BlasConfig::default().with_trace(true));
        assert_eq!(plain[[0]].to_bits(), traced[[0]].to_bits());
        assert_eq!(plain[[1]].to_bits(), traced[[1]].to_bits());
    }

    #[test]
    fn test_trace_mode_counts_inexact_rows() {
        let tiny = 2f64.powi(-30);
        let a = matrix(&[&[1.0, tiny], &[3.0, 0.0], &[0.1, 0.1]]);
        let config = BlasConfig::default().with_trace(true);
        let mut b = vector(&[0.0; 3]);

        // 1 + 2^-60 and 0.1 + 0.1 * 2^-30 both need more than 53 bits
        let x = vector(&[1.0, tiny]);
        assert_eq!(fmv_with_config(&a, &x, &mut b, &config), 2);
        assert_eq!(b[[0]], 1.0);
        assert_eq!(b[[1]], 3.0);

        // halving is exact
        let x = vector(&[0.5, 0.0]);
        assert_eq!(fmv_with_config(&a, &x, &mut b, &config), 0);
        assert_eq!(b[[1]], 1.5);

        let x = vector(&[1.0, tiny]);
        assert_eq!(fmv_with_config(&a, &x, &mut b, &BlasConfig::default()), 0);
    }

    #[test]
    fn test_matvec_with_dispatch() {
        let a = matrix(&[&[2.0, 0.0], &[0.0, 3.0]]);
        let x = vector(&[1.5, 2.0]);
        let mut b = vector(&[0.0; 2]);
        matvec_with(&a, &x, &mut b, Accumulation::Classic);
        assert_eq!(b[[1]], 6.0);
        matvec_with(&a, &x, &mut b, Accumulation::fused());
        assert_eq!(b[[0]], 3.0);
    }

    #[test]
    fn test_fused_residual_exact_solution() {
        let a = matrix(&[&[4.0, 2.0], &[2.0, 3.0]]);
        let x = vector(&[1.0, 1.0]);
        let b = vector(&[6.0, 5.0]);
        let r = fused_residual(&a, &x, &b);
        assert_eq!(r[[0]], 0.0);
        assert_eq!(r[[1]], 0.0);
    }

    #[test]
    #[should_panic(expected = "columns")]
    fn test_dimension_mismatch() {
        let a = matrix(&[&[1.0, 2.0]]);
        let x = vector(&[1.0]);
        let mut b = vector(&[0.0]);
        fmv(&a, &x, &mut b);
    }
}
