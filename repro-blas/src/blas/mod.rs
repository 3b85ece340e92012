//! Reproducible BLAS kernels
//!
//! Each level offers a classic variant that rounds after every operation and
//! a fused variant that accumulates exactly in a [`Quire`](crate::quire::Quire)
//! and rounds once per output element.

pub mod level1;
pub mod level2;
pub mod level3;

pub use level1::{axpy, copy, dot, dot_with, fdp, fdp_qc, fdp_stride, scal};
pub use level2::{fmv, fmv_with_config, fused_residual, matvec, matvec_with};
pub use level3::{bfmm, bfmm_with_config, bmm, fmm, fmm_par, matmul, matmul_with};
