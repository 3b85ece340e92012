//! Test-matrix generators and sub-block extraction
//!
//! Random generators take an explicit [`rand::Rng`] so results are
//! reproducible from a seed.

use std::ops::Range;

use mdarray::Tensor;
use rand::Rng;

use crate::precision::Precision;
use crate::{Matrix, Vector};

/// Copy the block `a[rows, cols]` into a new matrix
pub fn submatrix<T: Precision>(a: &Matrix<T>, rows: Range<usize>, cols: Range<usize>) -> Matrix<T> {
    let (m, n) = *a.shape();
    assert!(rows.start <= rows.end && rows.end <= m, "row range {rows:?} out of bounds for {m} rows");
    assert!(cols.start <= cols.end && cols.end <= n, "column range {cols:?} out of bounds for {n} columns");
    fill_matrix(rows.len(), cols.len(), |i, j| a[[rows.start + i, cols.start + j]])
}

/// Build a `rows x cols` matrix by visiting cells in row-major order.
///
/// `f` is never called for an empty shape.
pub(crate) fn fill_matrix<T: Precision>(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Matrix<T> {
    let mut a = Tensor::from_elem((rows, cols), T::zero());
    for i in 0..rows {
        for j in 0..cols {
            a[[i, j]] = f(i, j);
        }
    }
    a
}

pub fn identity<T: Precision>(n: usize) -> Matrix<T> {
    Tensor::from_fn((n, n), |idx| if idx[0] == idx[1] { T::one() } else { T::zero() })
}

/// Hilbert matrix `H[i,j] = 1 / (i + j + 1)`
pub fn hilbert<T: Precision>(n: usize) -> Matrix<T> {
    Tensor::from_fn((n, n), |idx| T::one() / T::round_from_f64((idx[0] + idx[1] + 1) as f64))
}

/// Scaled Hilbert matrix `lcm(1..2n-1) / (i + j + 1)`, exactly representable
/// for small `n` so the input carries no representation error.
pub fn scaled_hilbert<T: Precision>(n: usize) -> Matrix<T> {
    let mut lcm: u64 = 1;
    for k in 1..(2 * n).max(1) as u64 {
        lcm = lcm / gcd(lcm, k) * k;
    }
    Tensor::from_fn((n, n), |idx| {
        T::round_from_f64((lcm / (idx[0] + idx[1] + 1) as u64) as f64)
    })
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// 1-D Laplacian: tridiagonal with 2 on the diagonal and -1 off it (SPD)
pub fn laplace_1d<T: Precision>(n: usize) -> Matrix<T> {
    let two = T::one() + T::one();
    Tensor::from_fn((n, n), |idx| {
        let (i, j) = (idx[0], idx[1]);
        if i == j {
            two
        } else if i.abs_diff(j) == 1 {
            -T::one()
        } else {
            T::zero()
        }
    })
}

/// `M[i,j] = min(i, j) + 1` (SPD)
pub fn minij<T: Precision>(n: usize) -> Matrix<T> {
    Tensor::from_fn((n, n), |idx| T::round_from_f64((idx[0].min(idx[1]) + 1) as f64))
}

/// Matrix with entries drawn uniformly from `[lo, hi)`
pub fn uniform_matrix<T: Precision, R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    lo: f64,
    hi: f64,
    rng: &mut R,
) -> Matrix<T> {
    fill_matrix(rows, cols, |_, _| T::round_from_f64(rng.gen_range(lo..hi)))
}

/// Vector with entries drawn uniformly from `[lo, hi)`
pub fn uniform_vector<T: Precision, R: Rng + ?Sized>(n: usize, lo: f64, hi: f64, rng: &mut R) -> Vector<T> {
    let mut v = Tensor::from_elem((n,), T::zero());
    for i in 0..n {
        v[[i]] = T::round_from_f64(rng.gen_range(lo..hi));
    }
    v
}

/// Random strictly diagonally dominant matrix; LU without pivoting is stable on it
pub fn diagonally_dominant<T: Precision, R: Rng + ?Sized>(n: usize, rng: &mut R) -> Matrix<T> {
    let mut a: Matrix<T> = uniform_matrix(n, n, -1.0, 1.0, rng);
    for i in 0..n {
        a[[i, i]] = T::round_from_f64(n as f64 + 1.0);
    }
    a
}
