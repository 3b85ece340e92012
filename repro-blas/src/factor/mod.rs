//! Dense factorizations without pivoting, in classic and fused variants
//!
//! Both families run the same recurrences; they differ only in how the inner
//! sums are accumulated (see [`crate::accumulate`]). Numerical unsuitability
//! of the input (a zero pivot, a non-SPD matrix) is an expected outcome and is
//! reported as a [`FactorizationError`]. Shape mismatches are programming
//! errors and panic.

pub mod cholesky;
pub mod crout;

pub use cholesky::{
    cholesky, cholesky_determinant, cholesky_fdp, cholesky_into, cholesky_inverse, cholesky_with,
    solve_cholesky,
};
pub use crout::{crout, crout_fdp, crout_in_place, crout_with, solve_crout, solve_crout_fdp, solve_crout_with};

use crate::quire::ArithmeticError;
use crate::Matrix;

/// Error types for factorization and solve
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactorizationError {
    #[error("Zero pivot at index {index}")]
    ZeroPivot { index: usize },

    #[error("Matrix is not symmetric positive-definite: leading minor {index} is not positive")]
    NotPositiveDefinite { index: usize },

    #[error("Pivot at index {index} is not a real number")]
    NotAReal { index: usize },

    #[error("Arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

/// Order of a square matrix; panics otherwise
pub(crate) fn check_square<T>(name: &str, a: &Matrix<T>) -> usize {
    let (m, n) = *a.shape();
    assert_eq!(m, n, "{name}: matrix must be square, got {m}x{n}");
    n
}
