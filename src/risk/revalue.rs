//! Full-revaluation kernel shared by the Historical and Monte-Carlo paths.

use crate::core::{InstrumentKind, OptionSide, Result, RiskError};
use crate::instruments::{InstrumentBook, MIN_IMPLIED_VOL};
use crate::pricing::black_scholes;

/// Revalues the book under one factor-shock vector, returning the change
/// in portfolio value `V_shocked - V_today`.
///
/// Shocks are arithmetic per-factor returns: an equity at factor `id`
/// reprices to `current_price * (1 + shocks[id])`, and an option reprices
/// through the Black-Scholes closed form off its shocked underlying
/// `underlying_price * (1 + shocks[underlying_index])` with its own
/// volatility and expiry. Monte-Carlo log-returns must be converted with
/// `exp_m1` before entering here, keeping a single revaluation contract
/// for both VaR paths.
///
/// Fails with [`RiskError::OutOfRange`] if a referenced factor index lies
/// beyond the shock vector. Inputs are not mutated, so distinct shock
/// vectors may be revalued concurrently against the same book.
pub fn revalue(book: &InstrumentBook, shocks: &[f64]) -> Result<f64> {
    let dim = shocks.len();
    let mut value_today = 0.0_f64;
    let mut value_shocked = 0.0_f64;

    for i in 0..book.len() {
        let qty = book.qty[i];
        let price_today = book.current_price[i];
        value_today += price_today * qty;

        if qty == 0.0 {
            continue;
        }

        match book.kind[i] {
            InstrumentKind::Equity => {
                let factor = book.id[i] as usize;
                if factor >= dim {
                    return Err(RiskError::OutOfRange(format!(
                        "equity id {factor} references a factor beyond the shock vector ({dim})"
                    )));
                }
                value_shocked += price_today * (1.0 + shocks[factor]) * qty;
            }
            InstrumentKind::Option => {
                let factor = book.underlying_index[i] as usize;
                if factor >= dim {
                    return Err(RiskError::OutOfRange(format!(
                        "option underlying index {factor} references a factor beyond the shock vector ({dim})"
                    )));
                }

                let underlying_today = if book.underlying_price[i] > 0.0 {
                    book.underlying_price[i]
                } else {
                    price_today
                };
                let underlying_shocked = underlying_today * (1.0 + shocks[factor]);

                let shocked_price = black_scholes::price(
                    OptionSide::from_call_flag(book.is_call[i]),
                    underlying_shocked,
                    book.strike[i],
                    book.rate[i],
                    book.implied_vol[i].max(MIN_IMPLIED_VOL),
                    book.time_to_maturity[i].max(0.0),
                );
                value_shocked += shocked_price * qty;
            }
        }
    }

    Ok(value_shocked - value_today)
}
