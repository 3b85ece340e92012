//! Order-independence of the fused kernels
//!
//! The fused results must not change by a single bit when the summation
//! order, the tile size or the thread schedule changes.

use mdarray::Tensor;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use repro_blas::utils::{uniform_matrix, uniform_vector};
use repro_blas::{Matrix, Quire, Vector, bfmm, bfmm_with_config, bmm, fdp, fmm, fmm_par, fmv, BlasConfig};

fn assert_bitwise_eq(a: &Matrix<f64>, b: &Matrix<f64>) {
    assert_eq!(*a.shape(), *b.shape());
    let (m, n) = *a.shape();
    for i in 0..m {
        for j in 0..n {
            assert_eq!(a[[i, j]].to_bits(), b[[i, j]].to_bits(), "cell ({i}, {j})");
        }
    }
}

/// Values spread over many binades so classic summation is order sensitive
fn wide_range_vector(n: usize, rng: &mut ChaCha8Rng) -> Vector<f64> {
    let mantissas: Vector<f64> = uniform_vector(n, -1.0, 1.0, rng);
    Tensor::from_fn((n,), |idx| mantissas[[idx[0]]] * 2f64.powi((idx[0] % 60) as i32 - 30))
}

#[test]
fn test_fdp_small_integers() {
    let x: Vector<f64> = Tensor::from_fn((3,), |idx| [1.0, 2.0, 3.0][idx[0]]);
    let y: Vector<f64> = Tensor::from_fn((3,), |idx| [4.0, 5.0, 6.0][idx[0]]);
    assert_eq!(fdp(&x, &y), 32.0);
}

#[test]
fn test_fdp_permutation_invariance() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let n = 500;
    let x = wide_range_vector(n, &mut rng);
    let y = wide_range_vector(n, &mut rng);
    let reference = fdp(&x, &y);

    let mut order: Vec<usize> = (0..n).collect();
    for _ in 0..10 {
        order.shuffle(&mut rng);
        let xp: Vector<f64> = Tensor::from_fn((n,), |idx| x[[order[idx[0]]]]);
        let yp: Vector<f64> = Tensor::from_fn((n,), |idx| y[[order[idx[0]]]]);
        assert_eq!(fdp(&xp, &yp).to_bits(), reference.to_bits());
    }
}

#[test]
fn test_quire_partial_sums_merge_exactly() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let n = 200;
    let x = wide_range_vector(n, &mut rng);
    let y = wide_range_vector(n, &mut rng);

    let mut whole = Quire::<f64>::new();
    for i in 0..n {
        whole.add_product(x[[i]], y[[i]]);
    }

    // two halves accumulated separately and merged
    let mut low = Quire::<f64>::new();
    let mut high = Quire::<f64>::new();
    for i in 0..n / 2 {
        low.add_product(x[[i]], y[[i]]);
    }
    for i in n / 2..n {
        high.add_product(x[[i]], y[[i]]);
    }
    low.add_quire(&high);

    assert_eq!(low, whole);
    assert_eq!(low.to_value().to_bits(), fdp(&x, &y).to_bits());
}

#[test]
fn test_bfmm_matches_fmm_for_every_block_size() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let a: Matrix<f64> = uniform_matrix(33, 17, -1.0, 1.0, &mut rng);
    let b: Matrix<f64> = uniform_matrix(17, 21, -1.0, 1.0, &mut rng);
    let reference = fmm(&a, &b);

    for block_size in (1..=33).chain([64, 1000]) {
        assert_bitwise_eq(&bfmm(&a, &b, block_size), &reference);
    }
}

#[test]
fn test_bfmm_with_config() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let a: Matrix<f64> = uniform_matrix(10, 12, -2.0, 2.0, &mut rng);
    let b: Matrix<f64> = uniform_matrix(12, 6, -2.0, 2.0, &mut rng);
    let config = BlasConfig::new(4).with_capacity(30).with_trace(true);
    assert_bitwise_eq(&bfmm_with_config(&a, &b, &config), &fmm(&a, &b));
}

#[test]
fn test_fmm_par_matches_fmm() {
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let a: Matrix<f64> = uniform_matrix(40, 25, -1.0, 1.0, &mut rng);
    let b: Matrix<f64> = uniform_matrix(25, 30, -1.0, 1.0, &mut rng);
    assert_bitwise_eq(&fmm_par(&a, &b), &fmm(&a, &b));
}

#[test]
fn test_bmm_close_to_fmm() {
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let a: Matrix<f64> = uniform_matrix(16, 16, -1.0, 1.0, &mut rng);
    let b: Matrix<f64> = uniform_matrix(16, 16, -1.0, 1.0, &mut rng);
    let fused = fmm(&a, &b);
    let blocked = bmm(&a, &b, 4);
    for i in 0..16 {
        for j in 0..16 {
            assert!((fused[[i, j]] - blocked[[i, j]]).abs() < 1e-13);
        }
    }
}

#[test]
fn test_fmv_rows_match_fdp() {
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let a: Matrix<f64> = uniform_matrix(8, 50, -1.0, 1.0, &mut rng);
    let x: Vector<f64> = uniform_vector(50, -1.0, 1.0, &mut rng);
    let mut b: Vector<f64> = Tensor::from_elem((8,), 0.0);
    fmv(&a, &x, &mut b);
    for i in 0..8 {
        let row: Vector<f64> = Tensor::from_fn((50,), |idx| a[[i, idx[0]]]);
        assert_eq!(b[[i]].to_bits(), fdp(&row, &x).to_bits());
    }
}
