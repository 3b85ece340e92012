//! Vector and matrix norm computations
//!
//! The classic norms sum in working precision. The fused variants collect
//! the whole sum in one quire, round once, and only then take the square
//! root where one is needed.

use crate::accumulate::{Accumulation, Accumulator, with_accumulator};
use crate::precision::Precision;
use crate::quire::Quire;
use crate::{Matrix, Vector};

fn sum_abs_in<T: Precision, A: Accumulator<T>>(mut acc: A, vec: &Vector<T>) -> T {
    for &val in vec.iter() {
        acc.add_value(val.abs());
    }
    acc.to_value()
}

fn sum_squares_in<T: Precision, A: Accumulator<T>>(mut acc: A, values: impl Iterator<Item = T>) -> T {
    for val in values {
        acc.add_product(val, val);
    }
    acc.to_value()
}

/// Compute the 1-norm (sum of absolute values) of a vector
pub fn norm_1<T: Precision>(vec: &Vector<T>) -> T {
    let mut sum = T::zero();
    for i in 0..vec.len() {
        sum = sum + vec[[i]].abs();
    }
    sum
}

/// Compute the 2-norm (Euclidean norm) of a vector
pub fn norm_2<T: Precision>(vec: &Vector<T>) -> T {
    let mut sum = T::zero();
    for i in 0..vec.len() {
        let val = vec[[i]];
        sum = sum + val * val;
    }
    sum.sqrt()
}

/// Compute the maximum absolute value in a vector
pub fn norm_inf<T: Precision>(vec: &Vector<T>) -> T {
    let mut max_val = T::zero();
    for i in 0..vec.len() {
        let abs_val = vec[[i]].abs();
        if abs_val > max_val {
            max_val = abs_val;
        }
    }
    max_val
}

/// Compute the Frobenius norm of a matrix
pub fn norm_frobenius<T: Precision>(mat: &Matrix<T>) -> T {
    let (m, n) = *mat.shape();
    let mut sum = T::zero();
    for i in 0..m {
        for j in 0..n {
            let val = mat[[i, j]];
            sum = sum + val * val;
        }
    }
    sum.sqrt()
}

/// Compute the maximum absolute value in a matrix
pub fn norm_max<T: Precision>(mat: &Matrix<T>) -> T {
    let (m, n) = *mat.shape();
    let mut max_val = T::zero();
    for i in 0..m {
        for j in 0..n {
            let abs_val = mat[[i, j]].abs();
            if abs_val > max_val {
                max_val = abs_val;
            }
        }
    }
    max_val
}

/// 1-norm of a vector, summed exactly and rounded once
pub fn fused_norm_1<T: Precision>(vec: &Vector<T>) -> T {
    sum_abs_in(Quire::new(), vec)
}

/// 2-norm of a vector; the sum of squares is rounded once before `sqrt`
pub fn fused_norm_2<T: Precision>(vec: &Vector<T>) -> T {
    sum_squares_in(Quire::new(), vec.iter().copied()).sqrt()
}

/// Frobenius norm of a matrix; the sum of squares is rounded once before `sqrt`
pub fn fused_norm_frobenius<T: Precision>(mat: &Matrix<T>) -> T {
    sum_squares_in(Quire::new(), mat.iter().copied()).sqrt()
}

pub fn norm_1_with<T: Precision>(vec: &Vector<T>, accumulation: Accumulation) -> T {
    with_accumulator!(accumulation, acc => sum_abs_in(acc, vec))
}

pub fn norm_2_with<T: Precision>(vec: &Vector<T>, accumulation: Accumulation) -> T {
    with_accumulator!(accumulation, acc => sum_squares_in(acc, vec.iter().copied())).sqrt()
}

pub fn norm_frobenius_with<T: Precision>(mat: &Matrix<T>, accumulation: Accumulation) -> T {
    with_accumulator!(accumulation, acc => sum_squares_in(acc, mat.iter().copied())).sqrt()
}
