//! BLAS Level 3: matrix-matrix operations.
//!
//! - `matmul` / `fmm`: unblocked classic and fused products. `fmm` is the
//!   reference result: one quire per output cell, one rounding per cell.
//! - `bmm`: blocked product with scalar accumulation, rounding inside every
//!   block. Kept as a contrast baseline; it does not match `fmm` bitwise.
//! - `bfmm`: blocked fused product. Each output tile owns a tile-shaped
//!   matrix of quires that collects the exact partial products of every
//!   contraction tile; cells are rounded once after the last tile. Blocking
//!   only changes accumulation order, so `bfmm(a, b, s) == fmm(a, b)` bitwise
//!   for every block size `s`.
//! - `fmm_par`: fused product with rows distributed over rayon workers; each
//!   worker owns the quire for every cell it computes.

use mdarray::Tensor;
use rayon::prelude::*;

use crate::accumulate::{Accumulation, Accumulator, with_accumulator};
use crate::config::BlasConfig;
use crate::precision::Precision;
use crate::quire::Quire;
use crate::Matrix;

fn check_matmul<T>(name: &str, a: &Matrix<T>, b: &Matrix<T>) -> (usize, usize, usize) {
    let (m, k) = *a.shape();
    let (kb, n) = *b.shape();
    assert_eq!(k, kb, "{name}: A has {k} columns but B has {kb} rows");
    (m, k, n)
}

fn matmul_in<T: Precision, A: Accumulator<T>>(mut acc: A, a: &Matrix<T>, b: &Matrix<T>) -> Matrix<T> {
    let (m, k, n) = check_matmul("matmul", a, b);
    let mut c = Tensor::from_elem((m, n), T::zero());
    for i in 0..m {
        for j in 0..n {
            acc.reset();
            for p in 0..k {
                acc.add_product(a[[i, p]], b[[p, j]]);
            }
            c[[i, j]] = acc.to_value();
        }
    }
    c
}

/// Classic product `C = A * B`, rounding after every multiply-add
pub fn matmul<T: Precision>(a: &Matrix<T>, b: &Matrix<T>) -> Matrix<T> {
    let (m, k, n) = check_matmul("matmul", a, b);
    let mut c = Tensor::from_elem((m, n), T::zero());
    for i in 0..m {
        for j in 0..n {
            let mut sum = T::zero();
            for p in 0..k {
                sum = sum + a[[i, p]] * b[[p, j]];
            }
            c[[i, j]] = sum;
        }
    }
    c
}

/// Fused product `C = A * B`, one rounding per cell
pub fn fmm<T: Precision>(a: &Matrix<T>, b: &Matrix<T>) -> Matrix<T> {
    matmul_in(Quire::new(), a, b)
}

/// Product with the chosen accumulation
pub fn matmul_with<T: Precision>(a: &Matrix<T>, b: &Matrix<T>, accumulation: Accumulation) -> Matrix<T> {
    with_accumulator!(accumulation, acc => matmul_in(acc, a, b))
}

/// Fused product computed in parallel; bitwise equal to [`fmm`]
pub fn fmm_par<T: Precision>(a: &Matrix<T>, b: &Matrix<T>) -> Matrix<T> {
    let (m, k, n) = check_matmul("fmm_par", a, b);
    let rows: Vec<Vec<T>> = (0..m)
        .into_par_iter()
        .map(|i| {
            let mut quire = Quire::new();
            (0..n)
                .map(|j| {
                    quire.reset();
                    for p in 0..k {
                        quire.add_product(a[[i, p]], b[[p, j]]);
                    }
                    quire.to_value()
                })
                .collect()
        })
        .collect();
    let mut c = Tensor::from_elem((m, n), T::zero());
    for (i, row) in rows.into_iter().enumerate() {
        for (j, value) in row.into_iter().enumerate() {
            c[[i, j]] = value;
        }
    }
    c
}

/// Number of `block_size` tiles needed to cover `extent`
#[inline]
fn tile_count(extent: usize, block_size: usize) -> usize {
    extent.div_ceil(block_size)
}

/// Blocked product with scalar accumulation.
///
/// Each tile product is rounded cell by cell and then added into `C`, so the
/// result depends on `block_size`.
pub fn bmm<T: Precision>(a: &Matrix<T>, b: &Matrix<T>, block_size: usize) -> Matrix<T> {
    assert!(block_size > 0, "bmm: block size must be positive");
    let (m, k, n) = check_matmul("bmm", a, b);
    let mut c = Tensor::from_elem((m, n), T::zero());

    for bi in 0..tile_count(m, block_size) {
        let rows = bi * block_size..((bi + 1) * block_size).min(m);
        for bj in 0..tile_count(n, block_size) {
            let cols = bj * block_size..((bj + 1) * block_size).min(n);
            for bk in 0..tile_count(k, block_size) {
                let inner = bk * block_size..((bk + 1) * block_size).min(k);
                for i in rows.clone() {
                    for j in cols.clone() {
                        let mut partial = T::zero();
                        for p in inner.clone() {
                            partial = partial + a[[i, p]] * b[[p, j]];
                        }
                        c[[i, j]] = c[[i, j]] + partial;
                    }
                }
            }
        }
    }
    c
}

/// Blocked fused product; bitwise equal to [`fmm`] for every block size
pub fn bfmm<T: Precision>(a: &Matrix<T>, b: &Matrix<T>, block_size: usize) -> Matrix<T> {
    bfmm_with_config(a, b, &BlasConfig::new(block_size))
}

/// Blocked fused product using the configured tile size and quire capacity
pub fn bfmm_with_config<T: Precision>(a: &Matrix<T>, b: &Matrix<T>, config: &BlasConfig) -> Matrix<T> {
    let block_size = config.block_size;
    assert!(block_size > 0, "bfmm: block size must be positive");
    let (m, k, n) = check_matmul("bfmm", a, b);
    let mut c = Tensor::from_elem((m, n), T::zero());

    let (row_tiles, col_tiles, inner_tiles) = (
        tile_count(m, block_size),
        tile_count(n, block_size),
        tile_count(k, block_size),
    );
    tracing::trace!(m, n, k, block_size, row_tiles, col_tiles, inner_tiles, "bfmm tiling");

    // tiles never exceed the output extent
    let stride = block_size.min(n).max(1);
    let zero = Quire::<T>::with_capacity(config.capacity);
    let mut tile: Vec<Quire<T>> = vec![zero; block_size.min(m).max(1) * stride];

    for bi in 0..row_tiles {
        let row0 = bi * block_size;
        let tile_rows = block_size.min(m - row0);
        for bj in 0..col_tiles {
            let col0 = bj * block_size;
            let tile_cols = block_size.min(n - col0);

            for quire in tile.iter_mut() {
                quire.reset();
            }

            for bk in 0..inner_tiles {
                let inner0 = bk * block_size;
                let tile_inner = block_size.min(k - inner0);
                for i in 0..tile_rows {
                    for j in 0..tile_cols {
                        let quire = &mut tile[i * stride + j];
                        for p in 0..tile_inner {
                            quire.add_product(a[[row0 + i, inner0 + p]], b[[inner0 + p, col0 + j]]);
                        }
                    }
                }
            }

            for i in 0..tile_rows {
                for j in 0..tile_cols {
                    c[[row0 + i, col0 + j]] = tile[i * stride + j].to_value();
                }
            }
        }
    }
    c
}
