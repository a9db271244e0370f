//! Portfolio Greeks aggregation.

use crate::core::{Greeks, InstrumentKind, OptionSide};
use crate::instruments::InstrumentBook;
use crate::pricing::black_scholes;

/// Per-contract, per-position, and portfolio-total Greeks.
#[derive(Debug, Clone, Default)]
pub struct PortfolioGreeks {
    /// One row per instrument, unscaled.
    pub per_contract: Vec<Greeks>,
    /// Per-contract rows scaled by the signed position quantity.
    pub per_position: Vec<Greeks>,
    /// Componentwise sum of the per-position rows.
    pub totals: Greeks,
}

/// Computes Greeks for every row of the book.
///
/// Equities are delta-one: price equals the mark, delta is 1, everything
/// else 0. Options go through the Black-Scholes kernel with the spot
/// resolved as `spot_override` if given, else the stored underlying price,
/// else the contract mark. The kernel absorbs degenerate expiries and
/// volatilities, so this aggregation never fails.
pub fn compute_greeks(book: &InstrumentBook, spot_override: Option<f64>) -> PortfolioGreeks {
    let n = book.len();
    let mut result = PortfolioGreeks {
        per_contract: Vec::with_capacity(n),
        per_position: Vec::with_capacity(n),
        totals: Greeks::default(),
    };

    for i in 0..n {
        let contract = match book.kind[i] {
            InstrumentKind::Equity => Greeks {
                price: book.current_price[i],
                delta: 1.0,
                ..Greeks::default()
            },
            InstrumentKind::Option => {
                let spot = spot_override.unwrap_or(if book.underlying_price[i] > 0.0 {
                    book.underlying_price[i]
                } else {
                    book.current_price[i]
                });
                black_scholes::greeks(
                    OptionSide::from_call_flag(book.is_call[i]),
                    spot,
                    book.strike[i],
                    book.rate[i],
                    book.implied_vol[i],
                    book.time_to_maturity[i],
                )
            }
        };

        let position = contract.scaled(book.qty[i]);
        result.totals.accumulate(position);
        result.per_contract.push(contract);
        result.per_position.push(position);
    }

    result
}
