//! Crout LU factorization and solve
//!
//! The compact Crout form stores L (with its diagonal) in the lower triangle
//! and U (unit diagonal, implicit) in the strict upper triangle:
//!
//! ```text
//! D[i][k] =  S[i][k] - sum_{p<k} D[i][p] * D[p][k]             for i >= k
//! D[k][j] = (S[k][j] - sum_{p<k} D[k][p] * D[p][j]) / D[k][k]   for j >  k
//! ```
//!
//! Every entry of S is read exactly once, before it is overwritten, so the
//! factorization can run in place.

use mdarray::Tensor;

use super::{check_square, FactorizationError};
use crate::accumulate::{Accumulation, Accumulator, with_accumulator};
use crate::precision::Precision;
use crate::{Matrix, Vector};

fn check_pivot<T: Precision>(pivot: T, index: usize) -> Result<T, FactorizationError> {
    if pivot.is_nan() {
        Err(FactorizationError::NotAReal { index })
    } else if pivot == T::zero() {
        Err(FactorizationError::ZeroPivot { index })
    } else {
        Ok(pivot)
    }
}

fn crout_in<T: Precision, A: Accumulator<T>>(mut acc: A, d: &mut Matrix<T>) -> Result<(), FactorizationError> {
    let n = check_square("crout", d);
    for k in 0..n {
        for i in k..n {
            acc.reset();
            for p in 0..k {
                acc.add_product(d[[i, p]], d[[p, k]]);
            }
            let sum = acc.try_to_value()?;
            d[[i, k]] = d[[i, k]] - sum;
        }

        let pivot = check_pivot(d[[k, k]], k).inspect_err(|err| {
            tracing::debug!(index = k, %err, "crout factorization failed");
        })?;

        for j in (k + 1)..n {
            acc.reset();
            for p in 0..k {
                acc.add_product(d[[k, p]], d[[p, j]]);
            }
            let sum = acc.try_to_value()?;
            d[[k, j]] = (d[[k, j]] - sum) / pivot;
        }
    }
    Ok(())
}

/// Factor `a` in place into its compact Crout form
pub fn crout_in_place<T: Precision>(a: &mut Matrix<T>, accumulation: Accumulation) -> Result<(), FactorizationError> {
    with_accumulator!(accumulation, acc => crout_in(acc, a))
}

/// Crout factorization with the chosen accumulation
pub fn crout_with<T: Precision>(a: &Matrix<T>, accumulation: Accumulation) -> Result<Matrix<T>, FactorizationError> {
    let mut lu = a.clone();
    crout_in_place(&mut lu, accumulation)?;
    Ok(lu)
}

/// Crout factorization, inner sums rounded at every term
pub fn crout<T: Precision>(a: &Matrix<T>) -> Result<Matrix<T>, FactorizationError> {
    crout_with(a, Accumulation::Classic)
}

/// Crout factorization, each inner sum accumulated exactly and rounded once
pub fn crout_fdp<T: Precision>(a: &Matrix<T>) -> Result<Matrix<T>, FactorizationError> {
    crout_with(a, Accumulation::fused())
}

fn solve_crout_in<T: Precision, A: Accumulator<T>>(
    mut acc: A,
    lu: &Matrix<T>,
    b: &Vector<T>,
) -> Result<Vector<T>, FactorizationError> {
    let n = check_square("solve_crout", lu);
    assert_eq!(b.len(), n, "solve_crout: factor is {n}x{n} but b has {} elements", b.len());

    // L y = b
    let mut y = Tensor::from_elem((n,), T::zero());
    for i in 0..n {
        acc.reset();
        for k in 0..i {
            acc.add_product(lu[[i, k]], y[[k]]);
        }
        let pivot = check_pivot(lu[[i, i]], i)?;
        y[[i]] = (b[[i]] - acc.try_to_value()?) / pivot;
    }

    // U x = y, unit diagonal
    let mut x = Tensor::from_elem((n,), T::zero());
    for i in (0..n).rev() {
        acc.reset();
        for k in (i + 1)..n {
            acc.add_product(lu[[i, k]], x[[k]]);
        }
        x[[i]] = y[[i]] - acc.try_to_value()?;
    }
    Ok(x)
}

/// Solve `A x = b` from the Crout factor of `A` with the chosen accumulation
pub fn solve_crout_with<T: Precision>(
    lu: &Matrix<T>,
    b: &Vector<T>,
    accumulation: Accumulation,
) -> Result<Vector<T>, FactorizationError> {
    with_accumulator!(accumulation, acc => solve_crout_in(acc, lu, b))
}

/// Classic forward and back substitution
pub fn solve_crout<T: Precision>(lu: &Matrix<T>, b: &Vector<T>) -> Result<Vector<T>, FactorizationError> {
    solve_crout_with(lu, b, Accumulation::Classic)
}

/// Forward and back substitution with one rounding per row sum
pub fn solve_crout_fdp<T: Precision>(lu: &Matrix<T>, b: &Vector<T>) -> Result<Vector<T>, FactorizationError> {
    solve_crout_with(lu, b, Accumulation::fused())
}
