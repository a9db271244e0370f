//! OpenVaR is a portfolio market-risk engine: full-revaluation Historical
//! VaR/ES, Monte-Carlo VaR/ES under a correlated log-normal factor model,
//! and closed-form Black-Scholes Greeks over a column-oriented instrument
//! book.
//!
//! The crate is built around one shared contract: both VaR paths feed
//! factor-shock vectors through the same revaluation kernel
//! ([`risk::revalue`]) against the same structure-of-arrays book
//! ([`instruments::InstrumentBook`]), then extract VaR and Expected
//! Shortfall from the resulting P&L sample with the same quantile and
//! tail-mean rules. Loaders ([`loaders`]) deliver validated books, shock
//! matrices, and the factor universe; the core performs no I/O.
//!
//! References used across modules:
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 15
//!   and 19 for the Black-Scholes closed forms and Greeks.
//! - McNeil, Frey, Embrechts, *Quantitative Risk Management* (2015) for
//!   VaR/ES definitions and the loss-positive convention.
//! - Glasserman, *Monte Carlo Methods in Financial Engineering* (2004) for
//!   correlated Gaussian path generation.
//!
//! Numerical considerations:
//! - The pricing kernel floors time and volatility at `1e-8` and falls
//!   back to intrinsic values, so degenerate contracts never raise.
//! - The covariance factorization tolerates positive semi-definite inputs
//!   by zeroing near-zero pivots (small-sample covariances routinely sit
//!   on the PSD boundary); a strict mode is available for validation.
//! - Monte-Carlo results are bit-reproducible for a fixed
//!   `(seed, paths, threads)` triple; changing the worker count reassigns
//!   random streams and changes the sample.
//!
//! # Quick Start
//! Price a call and its Greeks:
//! ```rust
//! use openvar::core::OptionSide;
//! use openvar::pricing::black_scholes;
//!
//! let px = black_scholes::price(OptionSide::Call, 100.0, 100.0, 0.05, 0.20, 1.0);
//! assert!(px > 10.0 && px < 11.0);
//!
//! let g = black_scholes::greeks(OptionSide::Call, 100.0, 100.0, 0.05, 0.20, 1.0);
//! assert!(g.delta > 0.0 && g.gamma > 0.0 && g.vega > 0.0);
//! ```
//!
//! Historical VaR over a one-equity book:
//! ```rust
//! use openvar::instruments::{Instrument, InstrumentBook};
//! use openvar::risk::historical_var_es;
//! use openvar::universe::Universe;
//!
//! let universe = Universe::from_symbols(["SPY"]).unwrap();
//! let book = InstrumentBook::from_instruments(&[Instrument::equity(0, 1.0, 100.0)]);
//! let shocks = [-0.10, -0.05, 0.01, 0.02];
//! let metrics = historical_var_es(&book, &universe, &shocks, 4, 0.95).unwrap();
//! assert!((metrics.var - 10.0).abs() < 1e-9);
//! ```
//!
//! Monte-Carlo VaR with sample moments:
//! ```rust
//! use openvar::instruments::{Instrument, InstrumentBook};
//! use openvar::risk::{monte_carlo_var_es, McParams};
//! use openvar::universe::Universe;
//!
//! let universe = Universe::from_symbols(["SPY"]).unwrap();
//! let book = InstrumentBook::from_instruments(&[Instrument::equity(0, 1.0, 100.0)]);
//! let params = McParams { paths: 1000, seed: 42, threads: 1, ..McParams::default() };
//! let metrics =
//!     monte_carlo_var_es(&book, &universe, &[0.0], &[1.0e-4], 1.0, 0.99, &params).unwrap();
//! assert!(metrics.cvar >= metrics.var);
//! ```

pub mod core;
pub mod instruments;
pub mod loaders;
pub mod math;
pub mod pricing;
pub mod report;
pub mod risk;
pub mod universe;

pub use crate::core::{Greeks, InstrumentKind, OptionSide, Result, RiskError, RiskMetrics};
pub use crate::instruments::{Instrument, InstrumentBook};
pub use crate::risk::{
    compute_greeks, historical_var_es, monte_carlo_var_es, revalue, McParams, PortfolioGreeks,
};
pub use crate::universe::Universe;
