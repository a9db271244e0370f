//! Historical full-revaluation VaR/ES.

use crate::core::{Result, RiskError, RiskMetrics};
use crate::instruments::InstrumentBook;
use crate::risk::{revalue, var_es_from_pnl};
use crate::universe::Universe;

/// Historical VaR and Expected Shortfall over a flat row-major shock
/// matrix of `scenarios` rows by `universe.len()` columns.
///
/// Each row is revalued through the shared kernel to build the scenario
/// P&L sample; VaR is the negated `(1 - alpha)` quantile of that sample
/// and ES the negated tail mean, both reported as positive losses.
///
/// # Examples
/// ```rust
/// use openvar::instruments::{Instrument, InstrumentBook};
/// use openvar::risk::historical_var_es;
/// use openvar::universe::Universe;
///
/// let universe = Universe::from_symbols(["SPY"]).unwrap();
/// let book = InstrumentBook::from_instruments(&[Instrument::equity(0, 1.0, 100.0)]);
/// let shocks = [-0.10, -0.05, 0.01, 0.02];
/// let metrics = historical_var_es(&book, &universe, &shocks, 4, 0.95).unwrap();
/// assert!((metrics.var - 10.0).abs() < 1e-9);
/// ```
pub fn historical_var_es(
    book: &InstrumentBook,
    universe: &Universe,
    shocks_flat: &[f64],
    scenarios: usize,
    alpha: f64,
) -> Result<RiskMetrics> {
    let factors = universe.len();
    if factors == 0 {
        return Err(RiskError::InvalidArgument(
            "factor universe is empty".to_string(),
        ));
    }
    if scenarios == 0 {
        return Err(RiskError::InvalidArgument(
            "historical VaR requires at least one scenario".to_string(),
        ));
    }
    if shocks_flat.len() != scenarios * factors {
        return Err(RiskError::InvalidArgument(format!(
            "shock matrix has {} entries, expected {scenarios} x {factors}",
            shocks_flat.len()
        )));
    }
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(RiskError::InvalidArgument(format!(
            "alpha must lie in (0, 1), got {alpha}"
        )));
    }

    let mut pnl = Vec::with_capacity(scenarios);
    for row in shocks_flat.chunks_exact(factors) {
        pnl.push(revalue(book, row)?);
    }

    var_es_from_pnl(&pnl, alpha)
}
