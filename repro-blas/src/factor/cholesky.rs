//! Cholesky factorization `A = L * L^T` for symmetric positive-definite `A`
//!
//! ```text
//! L[k][k] = sqrt(A[k][k] - sum_{p<k} L[k][p]^2)
//! L[i][k] = (A[i][k] - sum_{p<k} L[i][p] * L[k][p]) / L[k][k]   for i > k
//! ```
//!
//! Only the lower triangle of `A` is read. A non-positive value under the
//! square root means `A` is not SPD; the factorization stops and reports the
//! failing index.

use mdarray::Tensor;

use super::{check_square, FactorizationError};
use crate::accumulate::{Accumulation, Accumulator, with_accumulator};
use crate::precision::Precision;
use crate::{Matrix, Vector};

fn cholesky_in<T: Precision, A: Accumulator<T>>(
    mut acc: A,
    a: &Matrix<T>,
    l: &mut Matrix<T>,
) -> Result<(), FactorizationError> {
    let n = check_square("cholesky", a);
    assert_eq!(*l.shape(), (n, n), "cholesky: factor must be {n}x{n}");

    for k in 0..n {
        acc.reset();
        for p in 0..k {
            acc.add_product(l[[k, p]], l[[k, p]]);
        }
        let diag = a[[k, k]] - acc.try_to_value()?;
        if diag.is_nan() {
            return Err(FactorizationError::NotAReal { index: k });
        }
        if diag <= T::zero() {
            return Err(FactorizationError::NotPositiveDefinite { index: k });
        }
        let lkk = diag.sqrt();
        l[[k, k]] = lkk;

        for i in (k + 1)..n {
            acc.reset();
            for p in 0..k {
                acc.add_product(l[[i, p]], l[[k, p]]);
            }
            l[[i, k]] = (a[[i, k]] - acc.try_to_value()?) / lkk;
        }
    }
    Ok(())
}

/// Factor `a` into `l` with the chosen accumulation.
///
/// On failure `l` is left zeroed, never holding a partial factor.
pub fn cholesky_into<T: Precision>(
    a: &Matrix<T>,
    l: &mut Matrix<T>,
    accumulation: Accumulation,
) -> Result<(), FactorizationError> {
    for value in l.iter_mut() {
        *value = T::zero();
    }
    let result = with_accumulator!(accumulation, acc => cholesky_in(acc, a, l));
    if let Err(err) = &result {
        tracing::debug!(%err, "cholesky factorization failed");
        for value in l.iter_mut() {
            *value = T::zero();
        }
    }
    result
}

/// Lower Cholesky factor with the chosen accumulation
pub fn cholesky_with<T: Precision>(a: &Matrix<T>, accumulation: Accumulation) -> Result<Matrix<T>, FactorizationError> {
    let n = check_square("cholesky", a);
    let mut l = Tensor::from_elem((n, n), T::zero());
    cholesky_into(a, &mut l, accumulation)?;
    Ok(l)
}

/// Lower Cholesky factor, inner sums rounded at every term
pub fn cholesky<T: Precision>(a: &Matrix<T>) -> Result<Matrix<T>, FactorizationError> {
    cholesky_with(a, Accumulation::Classic)
}

/// Lower Cholesky factor, each inner sum accumulated exactly and rounded once
pub fn cholesky_fdp<T: Precision>(a: &Matrix<T>) -> Result<Matrix<T>, FactorizationError> {
    cholesky_with(a, Accumulation::fused())
}

fn solve_cholesky_in<T: Precision, A: Accumulator<T>>(
    mut acc: A,
    l: &Matrix<T>,
    b: &Vector<T>,
) -> Result<Vector<T>, FactorizationError> {
    let n = check_square("solve_cholesky", l);
    assert_eq!(b.len(), n, "solve_cholesky: factor is {n}x{n} but b has {} elements", b.len());

    for i in 0..n {
        if l[[i, i]] == T::zero() {
            return Err(FactorizationError::ZeroPivot { index: i });
        }
    }

    // L y = b
    let mut y = Tensor::from_elem((n,), T::zero());
    for i in 0..n {
        acc.reset();
        for k in 0..i {
            acc.add_product(l[[i, k]], y[[k]]);
        }
        y[[i]] = (b[[i]] - acc.try_to_value()?) / l[[i, i]];
    }

    // L^T x = y
    let mut x = Tensor::from_elem((n,), T::zero());
    for i in (0..n).rev() {
        acc.reset();
        for k in (i + 1)..n {
            acc.add_product(l[[k, i]], x[[k]]);
        }
        x[[i]] = (y[[i]] - acc.try_to_value()?) / l[[i, i]];
    }
    Ok(x)
}

/// Solve `A x = b` from the lower Cholesky factor of `A`
pub fn solve_cholesky<T: Precision>(
    l: &Matrix<T>,
    b: &Vector<T>,
    accumulation: Accumulation,
) -> Result<Vector<T>, FactorizationError> {
    with_accumulator!(accumulation, acc => solve_cholesky_in(acc, l, b))
}

/// Inverse of `A` from its lower Cholesky factor, one column solve per unit vector
pub fn cholesky_inverse<T: Precision>(l: &Matrix<T>, accumulation: Accumulation) -> Result<Matrix<T>, FactorizationError> {
    let n = check_square("cholesky_inverse", l);
    let mut inverse = Tensor::from_elem((n, n), T::zero());
    let mut unit = Tensor::from_elem((n,), T::zero());
    for j in 0..n {
        unit[[j]] = T::one();
        let column = solve_cholesky(l, &unit, accumulation)?;
        for i in 0..n {
            inverse[[i, j]] = column[[i]];
        }
        unit[[j]] = T::zero();
    }
    Ok(inverse)
}

/// Determinant of `A` from its lower Cholesky factor: `prod L[i][i]^2`
pub fn cholesky_determinant<T: Precision>(l: &Matrix<T>) -> T {
    let n = check_square("cholesky_determinant", l);
    let mut det = T::one();
    for i in 0..n {
        det = det * l[[i, i]] * l[[i, i]];
    }
    det
}
