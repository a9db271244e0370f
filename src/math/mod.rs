//! Shared numerical primitives: normal distribution helpers, the
//! partial-selection quantile, the PSD-tolerant Cholesky factorization, and
//! sample moments of the shock matrix.
//!
//! References:
//! - Abramowitz and Stegun, *Handbook of Mathematical Functions*, §26.2 for
//!   the normal CDF/erfc relation.
//! - Golub and Van Loan, *Matrix Computations* (4th ed.), §4.2 for the
//!   Cholesky recursion.

pub mod cholesky;
pub mod moments;
pub mod quantile;

pub use cholesky::{cholesky_lower, CholeskyMode};
pub use moments::{sample_covariance, sample_mean};
pub use quantile::quantile_inplace;

use statrs::function::erf::erfc;

/// Standard normal density.
#[inline]
pub fn normal_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal CDF via the complementary error function,
/// `Phi(x) = erfc(-x / sqrt(2)) / 2`.
#[inline]
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}
