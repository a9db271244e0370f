//! Empirical quantile by partial selection.

use crate::core::{Result, RiskError};

/// Returns the `floor(q * (n - 1))`-th order statistic of `sample`.
///
/// `q` is clamped to `[0, 1]`; non-finite `q` and empty samples are
/// rejected. No interpolation is performed between neighboring order
/// statistics. The sample is partially reordered in place, so callers that
/// need the original ordering must pass a copy.
///
/// # Examples
/// ```rust
/// use openvar::math::quantile_inplace;
///
/// let mut pnl = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(quantile_inplace(&mut pnl, 0.25).unwrap(), 2.0);
/// ```
pub fn quantile_inplace(sample: &mut [f64], q: f64) -> Result<f64> {
    if sample.is_empty() {
        return Err(RiskError::InvalidArgument(
            "quantile requires a non-empty sample".to_string(),
        ));
    }
    if !q.is_finite() {
        return Err(RiskError::InvalidArgument(
            "quantile requires finite q".to_string(),
        ));
    }

    let q = q.clamp(0.0, 1.0);
    let n = sample.len();
    if n == 1 {
        return Ok(sample[0]);
    }

    let rank = q * (n - 1) as f64;
    let idx = rank.floor() as usize;

    let (_, value, _) = sample.select_nth_unstable_by(idx, f64::total_cmp);
    Ok(*value)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn returns_expected_order_statistics() {
        let mut data = vec![5.0, 3.0, 1.0, 4.0, 2.0];
        assert_relative_eq!(quantile_inplace(&mut data, 0.25).unwrap(), 2.0);

        let mut data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(quantile_inplace(&mut data, 0.50).unwrap(), 3.0);

        let mut data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(quantile_inplace(&mut data, 0.99).unwrap(), 4.0);
    }

    #[test]
    fn clamps_extreme_quantiles() {
        let mut data = vec![10.0, 20.0, 30.0];
        assert_relative_eq!(quantile_inplace(&mut data, -0.5).unwrap(), 10.0);

        let mut data = vec![10.0, 20.0, 30.0];
        assert_relative_eq!(quantile_inplace(&mut data, 1.5).unwrap(), 30.0);
    }

    #[test]
    fn single_element_sample_is_its_own_quantile() {
        let mut data = vec![7.5];
        assert_relative_eq!(quantile_inplace(&mut data, 0.0).unwrap(), 7.5);
        assert_relative_eq!(quantile_inplace(&mut data, 1.0).unwrap(), 7.5);
    }

    #[test]
    fn rejects_empty_sample_and_non_finite_q() {
        let mut empty: Vec<f64> = Vec::new();
        assert!(matches!(
            quantile_inplace(&mut empty, 0.5),
            Err(RiskError::InvalidArgument(_))
        ));

        let mut data = vec![1.0, 2.0];
        assert!(matches!(
            quantile_inplace(&mut data, f64::NAN),
            Err(RiskError::InvalidArgument(_))
        ));
    }
}
