//! Loaders delivering validated core inputs.
//!
//! The numerical core only ever sees data that already satisfies the §3
//! contracts: every loader here builds the factor universe, the instrument
//! book, and the shock matrices, rejecting malformed input before any
//! analytic runs. The core never reads files itself.

pub mod columnar;
pub mod market_csv;
pub mod portfolio_csv;

pub use columnar::{MarketSnapshot, ShockSnapshot};
pub use market_csv::{compute_shocks, load_closes_csv, read_closes, MarketData};
pub use portfolio_csv::{load_portfolio_csv, read_portfolio};

use crate::core::RiskError;

/// Failures raised while turning external tables into core inputs.
#[derive(Debug)]
pub enum LoaderError {
    /// Underlying file could not be opened or read.
    Io(std::io::Error),
    /// The CSV layer failed to parse a record.
    Csv(csv::Error),
    /// A structurally valid record violated the data contract.
    /// `row` is the 1-based line number including the header.
    Malformed { row: usize, msg: String },
    /// Validated data was still rejected by the core.
    Core(RiskError),
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "i/o error: {err}"),
            Self::Csv(err) => write!(f, "csv error: {err}"),
            Self::Malformed { row, msg } => write!(f, "malformed input at row {row}: {msg}"),
            Self::Core(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Malformed { .. } => None,
            Self::Core(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LoaderError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<RiskError> for LoaderError {
    fn from(err: RiskError) -> Self {
        Self::Core(err)
    }
}

/// Convenience alias for loader results.
pub type LoaderResult<T> = std::result::Result<T, LoaderError>;
