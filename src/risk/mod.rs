//! Portfolio risk analytics: the shared revaluation kernel, Historical and
//! Monte-Carlo VaR/ES, and the Greeks aggregator.
//!
//! Both VaR paths share one contract: a factor-shock vector goes through
//! [`revalue`] to produce a scenario P&L, the scenario P&Ls form a sample,
//! and VaR/ES are extracted from that sample's lower tail. The module uses
//! a loss-positive convention (`loss = -pnl`) throughout.
//!
//! References:
//! - McNeil, Frey, Embrechts, *Quantitative Risk Management* (2015) for
//!   VaR/ES definitions.
//! - Glasserman, *Monte Carlo Methods in Financial Engineering* (2004) for
//!   correlated-path simulation.

pub mod greeks;
pub mod historical;
pub mod monte_carlo;
pub mod revalue;

pub use greeks::{compute_greeks, PortfolioGreeks};
pub use historical::historical_var_es;
pub use monte_carlo::{monte_carlo_var_es, McParams};
pub use revalue::revalue;

use crate::core::{Result, RiskMetrics};
use crate::math::quantile_inplace;

/// Extracts VaR and ES from a scenario P&L sample.
///
/// VaR is the negated `(1 - alpha)` lower quantile; ES is the negated mean
/// of the P&Ls at or below that quantile, falling back to VaR itself if
/// the tail set is empty. The quantile selector permutes its input, so it
/// runs on a scratch copy.
pub(crate) fn var_es_from_pnl(pnl: &[f64], alpha: f64) -> Result<RiskMetrics> {
    let q_lower = (1.0 - alpha).clamp(0.0, 1.0);
    let mut scratch = pnl.to_vec();
    let threshold = quantile_inplace(&mut scratch, q_lower)?;

    let mut tail_sum = 0.0_f64;
    let mut tail_count = 0_usize;
    for &x in pnl {
        if x <= threshold {
            tail_sum += x;
            tail_count += 1;
        }
    }

    let var = -threshold;
    let cvar = if tail_count == 0 {
        var
    } else {
        -(tail_sum / tail_count as f64)
    };
    Ok(RiskMetrics { var, cvar })
}
