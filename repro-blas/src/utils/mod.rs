//! Norms, test matrices and result validation

pub mod matrices;
pub mod norms;
pub mod validation;

pub use matrices::{
    diagonally_dominant, hilbert, identity, laplace_1d, minij, scaled_hilbert, submatrix, uniform_matrix,
    uniform_vector,
};
pub use norms::{
    fused_norm_1, fused_norm_2, fused_norm_frobenius, norm_1, norm_1_with, norm_2, norm_2_with, norm_frobenius,
    norm_frobenius_with, norm_inf, norm_max,
};
pub use validation::{
    is_lower_triangular, is_symmetric, max_abs_difference, relative_error, validate_cholesky, validate_crout,
};
