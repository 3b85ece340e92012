//! # repro-blas: Reproducible BLAS
//!
//! Dense linear algebra whose results do not depend on evaluation order.
//! Fused kernels accumulate products exactly in a [`Quire`] and round once
//! per output element, so blocking, parallel scheduling or summation order
//! cannot change a single bit of the answer. Classic kernels with ordinary
//! rounding are provided alongside as a baseline.
//!
//! - Level 1: `axpy`, `dot`, `fdp`
//! - Level 2: `matvec`, `fmv`
//! - Level 3: `matmul`, `fmm`, `bmm`, `bfmm`
//! - Crout LU and Cholesky factorizations with solvers
//! - Vector and matrix norms
//!
//! Matrices are `mdarray` tensors.

pub mod accumulate;
pub mod blas;
pub mod config;
pub mod factor;
pub mod precision;
pub mod quire;
pub mod utils;

pub use accumulate::{Accumulation, Accumulator, ScalarSum};
pub use blas::{
    axpy, bfmm, bfmm_with_config, bmm, copy, dot, dot_with, fdp, fdp_qc, fdp_stride, fmm, fmm_par, fmv,
    fmv_with_config, fused_residual, matmul, matmul_with, matvec, matvec_with, scal,
};
pub use config::BlasConfig;
pub use factor::{
    FactorizationError, cholesky, cholesky_determinant, cholesky_fdp, cholesky_into, cholesky_inverse,
    cholesky_with, crout, crout_fdp, crout_in_place, crout_with, solve_cholesky, solve_crout, solve_crout_fdp,
    solve_crout_with,
};
pub use precision::Precision;
pub use quire::{ArithmeticError, Quire, DEFAULT_CAPACITY};
pub use utils::{
    fused_norm_1, fused_norm_2, fused_norm_frobenius, norm_1, norm_1_with, norm_2, norm_2_with, norm_frobenius,
    norm_frobenius_with, norm_inf, norm_max,
};

// Re-export mdarray types
pub use mdarray::Tensor;

// Type aliases for convenience
pub type Matrix<T> = Tensor<T, (usize, usize)>;
pub type Vector<T> = Tensor<T, (usize,)>;
