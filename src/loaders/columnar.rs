//! Data contract for columnar-database adapters.
//!
//! An external columnar store hands the engine whole columns at a time:
//! market closes keyed by ticker, pre-computed shock rows, and sample
//! moment frames. This module is the boundary those adapters must satisfy;
//! it validates the delivered frames into the same core inputs the CSV
//! path produces, so every analytic downstream is indifferent to the
//! source. The transport itself (connection handling, query execution) is
//! out of scope.

use crate::core::{Result, RiskError};
use crate::universe::Universe;

/// Close-price frame as delivered by a columnar adapter.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    /// One opaque date label per observation row.
    pub dates: Vec<String>,
    /// Ticker per close column, in factor order.
    pub tickers: Vec<String>,
    /// Row-major `dates.len() x tickers.len()` closes.
    pub closes_flat: Vec<f64>,
}

impl MarketSnapshot {
    /// Validates the frame and builds the factor universe from the ticker
    /// column order.
    pub fn into_universe_and_closes(self) -> Result<(Universe, Vec<String>, Vec<f64>)> {
        let rows = self.dates.len();
        let cols = self.tickers.len();
        if rows == 0 || cols == 0 {
            return Err(RiskError::InvalidArgument(
                "market snapshot has no rows or no tickers".to_string(),
            ));
        }
        if self.closes_flat.len() != rows * cols {
            return Err(RiskError::InvalidArgument(format!(
                "market snapshot has {} closes, expected {rows} x {cols}",
                self.closes_flat.len()
            )));
        }
        for (i, &close) in self.closes_flat.iter().enumerate() {
            if !close.is_finite() || close <= 0.0 {
                return Err(RiskError::InvalidArgument(format!(
                    "close at row {} for '{}' must be positive and finite, got {close}",
                    i / cols,
                    self.tickers[i % cols]
                )));
            }
        }

        let universe = Universe::from_symbols(self.tickers)?;
        Ok((universe, self.dates, self.closes_flat))
    }
}

/// Pre-computed shock frame as delivered by a columnar adapter.
#[derive(Debug, Clone, Default)]
pub struct ShockSnapshot {
    /// One opaque date label per scenario row.
    pub dates: Vec<String>,
    /// Row-major `dates.len() x factors` arithmetic-return shocks.
    pub shocks_flat: Vec<f64>,
}

impl ShockSnapshot {
    /// Validates the frame against the factor universe width.
    pub fn validated(self, expected_factors: usize) -> Result<Self> {
        if expected_factors == 0 {
            return Err(RiskError::UniverseMismatch(
                "shock snapshot requires a non-empty universe".to_string(),
            ));
        }
        let scenarios = self.dates.len();
        if scenarios == 0 {
            return Err(RiskError::InvalidArgument(
                "shock snapshot has no scenario rows".to_string(),
            ));
        }
        if self.shocks_flat.len() != scenarios * expected_factors {
            return Err(RiskError::UniverseMismatch(format!(
                "shock snapshot has {} entries, expected {scenarios} x {expected_factors}",
                self.shocks_flat.len()
            )));
        }
        if let Some(bad) = self.shocks_flat.iter().find(|x| !x.is_finite()) {
            return Err(RiskError::InvalidArgument(format!(
                "shock snapshot contains a non-finite entry: {bad}"
            )));
        }
        Ok(self)
    }

    /// Number of scenario rows.
    pub fn scenarios(&self) -> usize {
        self.dates.len()
    }
}

/// Validates an externally computed drift vector against the universe.
pub fn validate_mean_frame(mu: &[f64], expected_factors: usize) -> Result<()> {
    if mu.len() != expected_factors {
        return Err(RiskError::UniverseMismatch(format!(
            "mean frame has {} entries, universe has {expected_factors} factors",
            mu.len()
        )));
    }
    if let Some(bad) = mu.iter().find(|x| !x.is_finite()) {
        return Err(RiskError::InvalidArgument(format!(
            "mean frame contains a non-finite entry: {bad}"
        )));
    }
    Ok(())
}

/// Validates an externally computed covariance frame: square over the
/// universe, finite, and symmetric within `tol`.
pub fn validate_covariance_frame(cov: &[f64], expected_factors: usize, tol: f64) -> Result<()> {
    if cov.len() != expected_factors * expected_factors {
        return Err(RiskError::UniverseMismatch(format!(
            "covariance frame has {} entries, expected {expected_factors} x {expected_factors}",
            cov.len()
        )));
    }
    if let Some(bad) = cov.iter().find(|x| !x.is_finite()) {
        return Err(RiskError::InvalidArgument(format!(
            "covariance frame contains a non-finite entry: {bad}"
        )));
    }
    for i in 0..expected_factors {
        for j in 0..i {
            let a = cov[i * expected_factors + j];
            let b = cov[j * expected_factors + i];
            if (a - b).abs() > tol {
                return Err(RiskError::InvalidArgument(format!(
                    "covariance frame is asymmetric at ({i}, {j}): {a} vs {b}"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_snapshot_builds_universe_in_ticker_order() {
        let snapshot = MarketSnapshot {
            dates: vec!["2024-01-02".into(), "2024-01-03".into()],
            tickers: vec!["SPY".into(), "QQQ".into()],
            closes_flat: vec![100.0, 200.0, 101.0, 198.0],
        };
        let (universe, dates, closes) = snapshot.into_universe_and_closes().unwrap();
        assert_eq!(universe.position("QQQ"), Some(1));
        assert_eq!(dates.len(), 2);
        assert_eq!(closes.len(), 4);
    }

    #[test]
    fn market_snapshot_rejects_bad_frames() {
        let empty = MarketSnapshot::default();
        assert!(empty.into_universe_and_closes().is_err());

        let short = MarketSnapshot {
            dates: vec!["2024-01-02".into()],
            tickers: vec!["SPY".into(), "QQQ".into()],
            closes_flat: vec![100.0],
        };
        assert!(short.into_universe_and_closes().is_err());

        let negative = MarketSnapshot {
            dates: vec!["2024-01-02".into()],
            tickers: vec!["SPY".into()],
            closes_flat: vec![-1.0],
        };
        assert!(negative.into_universe_and_closes().is_err());
    }

    #[test]
    fn shock_snapshot_checks_factor_width() {
        let snapshot = ShockSnapshot {
            dates: vec!["2024-01-03".into()],
            shocks_flat: vec![0.01, -0.02],
        };
        assert!(snapshot.clone().validated(2).is_ok());
        assert!(matches!(
            snapshot.validated(3),
            Err(RiskError::UniverseMismatch(_))
        ));
    }

    #[test]
    fn moment_frames_are_validated_against_the_universe() {
        assert!(validate_mean_frame(&[0.0, 0.1], 2).is_ok());
        assert!(matches!(
            validate_mean_frame(&[0.0], 2),
            Err(RiskError::UniverseMismatch(_))
        ));
        assert!(validate_mean_frame(&[f64::NAN, 0.0], 2).is_err());

        let cov = [1.0, 0.5, 0.5, 1.0];
        assert!(validate_covariance_frame(&cov, 2, 1e-12).is_ok());

        let asym = [1.0, 0.5, 0.4, 1.0];
        assert!(validate_covariance_frame(&asym, 2, 1e-12).is_err());
        assert!(validate_covariance_frame(&cov, 3, 1e-12).is_err());
    }
}
