//! The factor universe: an ordered list of tickers whose positions double
//! as factor indices.
//!
//! The universe is built once by a loader and then passed by shared
//! reference into every analytic; nothing in the core mutates it. Each
//! equity's `id` is its factor index and each option's `underlying_index`
//! points into the same ordering, so drift vectors, covariance matrices,
//! and shock rows must all carry exactly `len()` entries.

use std::collections::HashMap;

use crate::core::{Result, RiskError};

/// Ordered ticker list with reverse lookup.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    symbols: Vec<String>,
    index: HashMap<String, usize>,
}

impl Universe {
    /// Builds the universe from an ordered symbol list.
    ///
    /// Empty and duplicate tickers are rejected: a duplicate would make the
    /// ticker-to-factor mapping ambiguous.
    pub fn from_symbols<I, S>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(symbols.len());
        for (i, symbol) in symbols.iter().enumerate() {
            if symbol.is_empty() {
                return Err(RiskError::InvalidArgument(format!(
                    "empty ticker at universe position {i}"
                )));
            }
            if index.insert(symbol.clone(), i).is_some() {
                return Err(RiskError::InvalidArgument(format!(
                    "duplicate ticker '{symbol}' in universe"
                )));
            }
        }
        Ok(Self { symbols, index })
    }

    /// Number of factors.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Ordered view of every ticker.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Factor index of `ticker`, if present.
    pub fn position(&self, ticker: &str) -> Option<usize> {
        self.index.get(ticker).copied()
    }

    /// Ticker at factor index `idx`, if in range.
    pub fn symbol(&self, idx: usize) -> Option<&str> {
        self.symbols.get(idx).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_follow_construction_order() {
        let universe = Universe::from_symbols(["SPY", "QQQ", "XOM"]).unwrap();
        assert_eq!(universe.len(), 3);
        assert_eq!(universe.position("SPY"), Some(0));
        assert_eq!(universe.position("XOM"), Some(2));
        assert_eq!(universe.position("TSLA"), None);
        assert_eq!(universe.symbol(1), Some("QQQ"));
        assert_eq!(universe.symbol(3), None);
    }

    #[test]
    fn rejects_duplicate_and_empty_tickers() {
        assert!(matches!(
            Universe::from_symbols(["SPY", "SPY"]),
            Err(RiskError::InvalidArgument(_))
        ));
        assert!(matches!(
            Universe::from_symbols(["SPY", ""]),
            Err(RiskError::InvalidArgument(_))
        ));
    }
}
