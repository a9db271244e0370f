//! Common domain types and the library-wide result/error structures.

pub mod error;
pub mod types;

pub use error::{Result, RiskError};
pub use types::{Greeks, InstrumentKind, OptionSide, RiskMetrics};
