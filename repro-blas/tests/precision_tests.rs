//! Single-precision and norm behaviour

use approx::assert_relative_eq;
use mdarray::Tensor;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use repro_blas::utils::{
    fused_norm_1, fused_norm_2, fused_norm_frobenius, norm_1, norm_2, norm_frobenius, norm_frobenius_with, norm_inf,
    uniform_matrix, uniform_vector,
};
use repro_blas::{Accumulation, Matrix, Vector, bfmm, cholesky_fdp, dot_with, fdp, fmm, solve_cholesky};

#[test]
fn test_f32_cancellation() {
    // 2^24 + 1 is not representable in f32
    let x: Vector<f32> = Tensor::from_fn((3,), |idx| [16777216.0, 1.0, -16777216.0][idx[0]]);
    let y: Vector<f32> = Tensor::from_elem((3,), 1.0);
    assert_eq!(dot_with(&x, &y, Accumulation::Classic), 0.0);
    assert_eq!(fdp(&x, &y), 1.0);
}

#[test]
fn test_f32_blocked_product() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let a: Matrix<f32> = uniform_matrix(9, 11, -1.0, 1.0, &mut rng);
    let b: Matrix<f32> = uniform_matrix(11, 5, -1.0, 1.0, &mut rng);
    let reference = fmm(&a, &b);
    for block_size in [1, 3, 4, 16] {
        let c = bfmm(&a, &b, block_size);
        for i in 0..9 {
            for j in 0..5 {
                assert_eq!(c[[i, j]].to_bits(), reference[[i, j]].to_bits());
            }
        }
    }
}

#[test]
fn test_f32_cholesky_solve() {
    let a: Matrix<f32> = Tensor::from_fn((2, 2), |idx| [[4.0, 2.0], [2.0, 3.0]][idx[0]][idx[1]]);
    let b: Vector<f32> = Tensor::from_fn((2,), |idx| [6.0, 5.0][idx[0]]);
    let l = cholesky_fdp(&a).unwrap();
    let x = solve_cholesky(&l, &b, Accumulation::fused()).unwrap();
    assert_relative_eq!(x[[0]], 1.0, epsilon = 1e-6);
    assert_relative_eq!(x[[1]], 1.0, epsilon = 1e-6);
}

#[test]
fn test_norms_agree() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let v: Vector<f64> = uniform_vector(1000, -10.0, 10.0, &mut rng);
    assert_relative_eq!(fused_norm_1(&v), norm_1(&v), max_relative = 1e-13);
    assert_relative_eq!(fused_norm_2(&v), norm_2(&v), max_relative = 1e-13);

    let m: Matrix<f64> = uniform_matrix(20, 30, -1.0, 1.0, &mut rng);
    assert_relative_eq!(fused_norm_frobenius(&m), norm_frobenius(&m), max_relative = 1e-13);
    assert_eq!(
        norm_frobenius_with(&m, Accumulation::fused()).to_bits(),
        fused_norm_frobenius(&m).to_bits()
    );
    assert!(norm_inf(&v) <= 10.0);
}

#[test]
fn test_fused_norm_2_avoids_intermediate_rounding() {
    // 1 + 2^-60 squared terms: only the quire sees the tiny contributions
    let n = 1 << 12;
    let tiny = 2f64.powi(-30);
    let v: Vector<f64> = Tensor::from_fn((n + 1,), |idx| if idx[0] == 0 { 1.0 } else { tiny });
    // sum of squares is 1 + 2^12 * 2^-60 = 1 + 2^-48
    let exact = (1.0 + 2f64.powi(-48)).sqrt();
    assert_eq!(fused_norm_2(&v), exact);
    assert_eq!(norm_2(&v), 1.0);
}
