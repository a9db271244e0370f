//! Sample moments of a flat row-major shock matrix.
//!
//! These feed the Monte-Carlo engine when drift and covariance are
//! estimated from the historical shock matrix rather than supplied
//! externally. The covariance uses the unbiased `rows - 1` divisor and
//! collapses to the zero matrix for a single observation.

use crate::core::{Result, RiskError};

fn check_shape(shocks: &[f64], rows: usize, cols: usize) -> Result<()> {
    if cols == 0 {
        return Err(RiskError::InvalidArgument(
            "shock matrix must have a positive factor dimension".to_string(),
        ));
    }
    if shocks.len() != rows * cols {
        return Err(RiskError::InvalidArgument(format!(
            "shock matrix has {} entries, expected {rows} x {cols}",
            shocks.len()
        )));
    }
    Ok(())
}

/// Per-factor mean of a `rows x cols` shock matrix.
pub fn sample_mean(shocks: &[f64], rows: usize, cols: usize) -> Result<Vec<f64>> {
    if rows == 0 {
        return Err(RiskError::InvalidArgument(
            "sample mean requires at least one observation".to_string(),
        ));
    }
    check_shape(shocks, rows, cols)?;

    let mut mean = vec![0.0_f64; cols];
    for row in shocks.chunks_exact(cols) {
        for (acc, &x) in mean.iter_mut().zip(row) {
            *acc += x;
        }
    }
    let inv = 1.0 / rows as f64;
    for acc in &mut mean {
        *acc *= inv;
    }
    Ok(mean)
}

/// Row-major `cols x cols` sample covariance of a `rows x cols` shock
/// matrix around `mean`.
pub fn sample_covariance(
    shocks: &[f64],
    mean: &[f64],
    rows: usize,
    cols: usize,
) -> Result<Vec<f64>> {
    check_shape(shocks, rows, cols)?;
    if mean.len() != cols {
        return Err(RiskError::InvalidArgument(format!(
            "mean vector has {} entries, expected {cols}",
            mean.len()
        )));
    }

    let mut cov = vec![0.0_f64; cols * cols];
    if rows <= 1 {
        return Ok(cov);
    }

    let mut diff = vec![0.0_f64; cols];
    for row in shocks.chunks_exact(cols) {
        for ((d, &x), &m) in diff.iter_mut().zip(row).zip(mean) {
            *d = x - m;
        }
        for i in 0..cols {
            let di = diff[i];
            for j in 0..cols {
                cov[i * cols + j] += di * diff[j];
            }
        }
    }

    let inv = 1.0 / (rows - 1) as f64;
    for entry in &mut cov {
        *entry *= inv;
    }
    Ok(cov)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn mean_averages_each_column() {
        let shocks = [0.01, 0.02, 0.03, 0.04, -0.01, 0.00];
        let mean = sample_mean(&shocks, 3, 2).unwrap();
        assert_relative_eq!(mean[0], 0.01, epsilon = 1e-15);
        assert_relative_eq!(mean[1], 0.02, epsilon = 1e-15);
    }

    #[test]
    fn covariance_matches_hand_computation() {
        // Two observations of two factors.
        let shocks = [0.01, -0.02, 0.03, 0.02];
        let mean = sample_mean(&shocks, 2, 2).unwrap();
        let cov = sample_covariance(&shocks, &mean, 2, 2).unwrap();

        // Deviations are (-+0.01, -+0.02); with the n-1 divisor the
        // covariance entries are products of those half-ranges times 2.
        assert_relative_eq!(cov[0], 2.0e-4, epsilon = 1e-15);
        assert_relative_eq!(cov[1], 4.0e-4, epsilon = 1e-15);
        assert_relative_eq!(cov[2], 4.0e-4, epsilon = 1e-15);
        assert_relative_eq!(cov[3], 8.0e-4, epsilon = 1e-15);
    }

    #[test]
    fn single_observation_yields_zero_covariance() {
        let shocks = [0.05, -0.01];
        let mean = sample_mean(&shocks, 1, 2).unwrap();
        let cov = sample_covariance(&shocks, &mean, 1, 2).unwrap();
        assert!(cov.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn rejects_shape_mismatches() {
        assert!(sample_mean(&[0.1; 5], 2, 2).is_err());
        assert!(sample_mean(&[], 0, 2).is_err());
        let mean = [0.0, 0.0, 0.0];
        assert!(sample_covariance(&[0.1; 4], &mean, 2, 2).is_err());
    }
}
