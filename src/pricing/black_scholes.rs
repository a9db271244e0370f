//! Closed-form Black-Scholes prices and Greeks for European options.
//!
//! The kernel never fails: non-positive spot or strike collapses to zero
//! output, and expiries or volatilities at the numerical floor fall into an
//! intrinsic-value branch with well-defined limit Greeks. Outputs are in
//! raw units (theta per year, vega and rho per 1.00 move); any display
//! scaling belongs to the reporting layer.
//!
//! References: Hull, *Options, Futures, and Other Derivatives* (11th ed.),
//! Ch. 15; Haug, *The Complete Guide to Option Pricing Formulas* (2007).

use crate::core::{Greeks, OptionSide};
use crate::math::{normal_cdf, normal_pdf};

/// Floor applied to time to maturity before entering the closed form.
pub const MIN_TIME: f64 = 1e-8;
/// Floor applied to volatility before entering the closed form.
pub const MIN_VOL: f64 = 1e-8;

#[inline]
fn d1_d2(spot: f64, strike: f64, rate: f64, vol: f64, tau: f64) -> (f64, f64) {
    let vol_sqrt_tau = vol * tau.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * tau) / vol_sqrt_tau;
    (d1, d1 - vol_sqrt_tau)
}

#[inline]
fn intrinsic(side: OptionSide, spot: f64, strike: f64) -> f64 {
    match side {
        OptionSide::Call => (spot - strike).max(0.0),
        OptionSide::Put => (strike - spot).max(0.0),
    }
}

/// European option price.
///
/// # Examples
/// ```rust
/// use openvar::core::OptionSide;
/// use openvar::pricing::black_scholes;
///
/// let call = black_scholes::price(OptionSide::Call, 100.0, 100.0, 0.05, 0.20, 1.0);
/// assert!((call - 10.4505836).abs() < 1e-6);
/// ```
pub fn price(side: OptionSide, spot: f64, strike: f64, rate: f64, vol: f64, tau: f64) -> f64 {
    if spot <= 0.0 || strike <= 0.0 {
        return 0.0;
    }
    if tau <= MIN_TIME || vol <= MIN_VOL {
        return intrinsic(side, spot, strike);
    }

    let tau = tau.max(MIN_TIME);
    let vol = vol.max(MIN_VOL);
    let (d1, d2) = d1_d2(spot, strike, rate, vol, tau);
    let disc = (-rate * tau).exp();

    match side {
        OptionSide::Call => spot * normal_cdf(d1) - strike * disc * normal_cdf(d2),
        OptionSide::Put => strike * disc * normal_cdf(-d2) - spot * normal_cdf(-d1),
    }
}

/// European option price and Greeks in one pass.
///
/// The degenerate branch (expired or deterministic option) returns the
/// intrinsic value with a binary delta and zero second-order Greeks, the
/// limit of the closed form as `tau` or `vol` goes to zero.
pub fn greeks(side: OptionSide, spot: f64, strike: f64, rate: f64, vol: f64, tau: f64) -> Greeks {
    if spot <= 0.0 || strike <= 0.0 {
        return Greeks::default();
    }

    if tau <= MIN_TIME || vol <= MIN_VOL {
        let delta = match side {
            OptionSide::Call => {
                if spot > strike {
                    1.0
                } else {
                    0.0
                }
            }
            OptionSide::Put => {
                if spot < strike {
                    -1.0
                } else {
                    0.0
                }
            }
        };
        return Greeks {
            price: intrinsic(side, spot, strike),
            delta,
            ..Greeks::default()
        };
    }

    let tau = tau.max(MIN_TIME);
    let vol = vol.max(MIN_VOL);
    let sqrt_tau = tau.sqrt();
    let (d1, d2) = d1_d2(spot, strike, rate, vol, tau);
    let pdf_d1 = normal_pdf(d1);
    let disc = (-rate * tau).exp();

    let mut g = match side {
        OptionSide::Call => {
            let nd1 = normal_cdf(d1);
            let nd2 = normal_cdf(d2);
            Greeks {
                price: spot * nd1 - strike * disc * nd2,
                delta: nd1,
                theta: -(spot * pdf_d1 * vol) / (2.0 * sqrt_tau) - rate * strike * disc * nd2,
                rho: strike * tau * disc * nd2,
                ..Greeks::default()
            }
        }
        OptionSide::Put => {
            let nd1 = normal_cdf(-d1);
            let nd2 = normal_cdf(-d2);
            Greeks {
                price: strike * disc * nd2 - spot * nd1,
                delta: nd1 - 1.0,
                theta: -(spot * pdf_d1 * vol) / (2.0 * sqrt_tau) + rate * strike * disc * nd2,
                rho: -strike * tau * disc * nd2,
                ..Greeks::default()
            }
        }
    };

    g.gamma = pdf_d1 / (spot * vol * sqrt_tau);
    g.vega = spot * pdf_d1 * sqrt_tau;
    g
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    const TOL: f64 = 1e-6;

    #[test]
    fn call_price_and_greeks_match_known_values() {
        let g = greeks(OptionSide::Call, 100.0, 100.0, 0.05, 0.20, 1.0);

        assert_abs_diff_eq!(g.price, 10.4505835721856, epsilon = TOL);
        assert_abs_diff_eq!(g.delta, 0.636830651175619, epsilon = TOL);
        assert_abs_diff_eq!(g.gamma, 0.0187620173458469, epsilon = TOL);
        assert_abs_diff_eq!(g.vega, 37.5240346916938, epsilon = TOL);
        assert_abs_diff_eq!(g.theta, -6.4140275464382, epsilon = TOL);
        assert_abs_diff_eq!(g.rho, 53.2324815453763, epsilon = TOL);
    }

    #[test]
    fn put_price_and_greeks_match_known_values() {
        let g = greeks(OptionSide::Put, 100.0, 100.0, 0.05, 0.20, 1.0);

        assert_abs_diff_eq!(g.price, 5.57352602225697, epsilon = TOL);
        assert_abs_diff_eq!(g.delta, -0.363169348824381, epsilon = TOL);
        assert_abs_diff_eq!(g.gamma, 0.0187620173458469, epsilon = TOL);
        assert_abs_diff_eq!(g.vega, 37.5240346916938, epsilon = TOL);
        assert_abs_diff_eq!(g.theta, -1.65788042393463, epsilon = TOL);
        assert_abs_diff_eq!(g.rho, -41.8904609046951, epsilon = TOL);
    }

    #[test]
    fn put_call_parity_holds() {
        let (s, k, r, vol, tau) = (100.0, 95.0, 0.03, 0.22, 1.4);
        let call = price(OptionSide::Call, s, k, r, vol, tau);
        let put = price(OptionSide::Put, s, k, r, vol, tau);
        assert_abs_diff_eq!(call - put, s - k * (-r * tau).exp(), epsilon = 1e-10);
    }

    #[test]
    fn degenerate_inputs_collapse_to_intrinsic() {
        let call = greeks(OptionSide::Call, 110.0, 100.0, 0.01, 1e-8, 1e-8);
        assert_abs_diff_eq!(call.price, 10.0, epsilon = TOL);
        assert_eq!(call.delta, 1.0);
        assert_eq!(call.gamma, 0.0);
        assert_eq!(call.vega, 0.0);
        assert_eq!(call.theta, 0.0);
        assert_eq!(call.rho, 0.0);

        let put = greeks(OptionSide::Put, 110.0, 100.0, 0.01, 1e-8, 1e-8);
        assert_abs_diff_eq!(put.price, 0.0, epsilon = TOL);
        assert_eq!(put.delta, 0.0);

        assert_abs_diff_eq!(
            price(OptionSide::Call, 110.0, 100.0, 0.01, 1e-8, 1e-8),
            10.0,
            epsilon = TOL
        );
        assert_abs_diff_eq!(
            price(OptionSide::Put, 110.0, 100.0, 0.01, 1e-8, 1e-8),
            0.0,
            epsilon = TOL
        );
    }

    #[test]
    fn non_positive_spot_or_strike_yields_zero() {
        assert_eq!(price(OptionSide::Call, 0.0, 100.0, 0.05, 0.2, 1.0), 0.0);
        assert_eq!(price(OptionSide::Put, 100.0, 0.0, 0.05, 0.2, 1.0), 0.0);
        assert_eq!(
            greeks(OptionSide::Call, -5.0, 100.0, 0.05, 0.2, 1.0),
            Greeks::default()
        );
    }

    #[test]
    fn greeks_agree_with_finite_differences() {
        let (s, k, r, vol, tau) = (100.0, 100.0, 0.05, 0.2, 1.0);
        let ds = 1e-3;
        let g = greeks(OptionSide::Call, s, k, r, vol, tau);

        let up = price(OptionSide::Call, s + ds, k, r, vol, tau);
        let mid = price(OptionSide::Call, s, k, r, vol, tau);
        let dn = price(OptionSide::Call, s - ds, k, r, vol, tau);

        assert_relative_eq!(g.delta, (up - dn) / (2.0 * ds), epsilon = 1e-4);
        assert_relative_eq!(g.gamma, (up - 2.0 * mid + dn) / (ds * ds), epsilon = 1e-4);
    }
}
