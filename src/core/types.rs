use serde::Serialize;

/// Plain-vanilla option side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSide {
    /// Call option payoff profile.
    Call,
    /// Put option payoff profile.
    Put,
}

impl OptionSide {
    /// Maps the wire-format `is_call` flag onto the closed variant.
    #[inline]
    pub fn from_call_flag(is_call: bool) -> Self {
        if is_call {
            Self::Call
        } else {
            Self::Put
        }
    }

    /// Returns +1.0 for calls and -1.0 for puts.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Self::Call => 1.0,
            Self::Put => -1.0,
        }
    }
}

/// Instrument kind tag stored in the book's type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentKind {
    /// Cash equity, delta-one against its own factor.
    Equity,
    /// European option on one factor of the universe.
    Option,
}

impl InstrumentKind {
    /// Wire encoding used by the portfolio table (0 = equity, 1 = option).
    #[inline]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Equity),
            1 => Some(Self::Option),
            _ => None,
        }
    }

    #[inline]
    pub fn is_option(self) -> bool {
        matches!(self, Self::Option)
    }
}

/// Price and sensitivities of one contract.
///
/// Units are raw: `delta` in shares, `vega` per 1.00 volatility move,
/// `theta` per year, `rho` per 1.00 rate move. Display scaling (per-day
/// theta, per-1% vega and rho) lives in the reporting layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Greeks {
    /// Present value per contract.
    pub price: f64,
    /// First derivative to spot.
    pub delta: f64,
    /// Second derivative to spot.
    pub gamma: f64,
    /// First derivative to volatility.
    pub vega: f64,
    /// First derivative to time.
    pub theta: f64,
    /// First derivative to rate.
    pub rho: f64,
}

impl Greeks {
    /// Scales every component by a signed position quantity.
    #[inline]
    pub fn scaled(self, qty: f64) -> Self {
        Self {
            price: self.price * qty,
            delta: self.delta * qty,
            gamma: self.gamma * qty,
            vega: self.vega * qty,
            theta: self.theta * qty,
            rho: self.rho * qty,
        }
    }

    /// Accumulates another row componentwise.
    #[inline]
    pub fn accumulate(&mut self, other: Self) {
        self.price += other.price;
        self.delta += other.delta;
        self.gamma += other.gamma;
        self.vega += other.vega;
        self.theta += other.theta;
        self.rho += other.rho;
    }
}

/// Tail-risk result pair, both reported as positive losses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskMetrics {
    /// Value-at-Risk at the requested confidence.
    pub var: f64,
    /// Expected Shortfall (CVaR) beyond the VaR threshold.
    pub cvar: f64,
}
