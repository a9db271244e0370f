//! Lower-triangular square roots of covariance matrices.

use crate::core::{Result, RiskError};

/// Tolerance below which a diagonal pivot is treated as a zero
/// eigen-direction rather than a factorization failure.
pub const PSD_TOL: f64 = 1e-12;

/// Pivot policy for [`cholesky_lower`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CholeskyMode {
    /// Zero out near-zero pivots, admitting positive semi-definite inputs.
    #[default]
    Tolerant,
    /// Fail on any non-positive pivot. Used by validation paths.
    Strict,
}

/// Banachiewicz factorization of a row-major `dim x dim` covariance matrix.
///
/// Returns lower-triangular `L` (row-major, upper entries zero) with
/// `L * L^T = cov` for positive-definite inputs. In tolerant mode a pivot
/// candidate within [`PSD_TOL`] of zero produces a zero row/column instead
/// of an error, which keeps small-sample covariances with degenerate
/// directions usable; a pivot below `-PSD_TOL` still fails. Strict mode
/// rejects any pivot at or below zero.
pub fn cholesky_lower(cov: &[f64], dim: usize, mode: CholeskyMode) -> Result<Vec<f64>> {
    if dim == 0 {
        return Err(RiskError::InvalidArgument(
            "covariance matrix must be non-empty".to_string(),
        ));
    }
    if cov.len() != dim * dim {
        return Err(RiskError::InvalidArgument(format!(
            "covariance matrix must be {dim}x{dim}, got {} entries",
            cov.len()
        )));
    }

    let mut lower = vec![0.0_f64; dim * dim];

    for i in 0..dim {
        for j in 0..=i {
            let mut sum = cov[i * dim + j];
            for k in 0..j {
                sum -= lower[i * dim + k] * lower[j * dim + k];
            }

            if i == j {
                match mode {
                    CholeskyMode::Strict => {
                        if sum <= 0.0 {
                            return Err(RiskError::NotPositiveDefinite(format!(
                                "pivot {sum:e} at row {i}"
                            )));
                        }
                        lower[i * dim + i] = sum.sqrt();
                    }
                    CholeskyMode::Tolerant => {
                        if sum < -PSD_TOL {
                            return Err(RiskError::NotPositiveDefinite(format!(
                                "pivot {sum:e} at row {i}"
                            )));
                        }
                        lower[i * dim + i] = if sum <= PSD_TOL { 0.0 } else { sum.sqrt() };
                    }
                }
            } else {
                let pivot = lower[j * dim + j];
                lower[i * dim + j] = if pivot.abs() <= PSD_TOL {
                    0.0
                } else {
                    sum / pivot
                };
            }
        }
    }

    Ok(lower)
}
