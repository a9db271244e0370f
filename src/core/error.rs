//! Library-wide error taxonomy.
//!
//! Every failure kind is fatal to the current call: the engine does not
//! retry and does not partially succeed. Transient numerical conditions in
//! the Black-Scholes kernel are absorbed by its degenerate-input branch and
//! never surface here.

/// Errors surfaced by the risk analytics API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskError {
    /// Shape mismatch, empty sample, or a parameter outside its domain.
    InvalidArgument(String),
    /// An instrument references a factor index beyond the shock vector.
    OutOfRange(String),
    /// Covariance failed strict positive-definiteness checks.
    NotPositiveDefinite(String),
    /// A vector or matrix dimension disagrees with the factor universe.
    UniverseMismatch(String),
}

impl std::fmt::Display for RiskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::OutOfRange(msg) => write!(f, "out of range: {msg}"),
            Self::NotPositiveDefinite(msg) => write!(f, "not positive definite: {msg}"),
            Self::UniverseMismatch(msg) => write!(f, "universe mismatch: {msg}"),
        }
    }
}

impl std::error::Error for RiskError {}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, RiskError>;
