//! Instrument rows and the column-oriented book.
//!
//! The structure-of-arrays layout is deliberate: the revaluation kernels
//! stream column-wise over quantities, prices, and factor indices, and the
//! parallel arrays keep that loop cache-friendly. Loaders build the book
//! once; every analytic afterwards takes it by shared reference.

use crate::core::InstrumentKind;

/// Volatility floor applied to option rows when they enter the book.
pub const MIN_IMPLIED_VOL: f64 = 1e-8;

/// One position row, as delivered by the loaders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instrument {
    /// Stable identifier; doubles as the factor index for equities.
    pub id: u32,
    pub kind: InstrumentKind,
    /// Call/put flag; ignored for equities.
    pub is_call: bool,
    /// Signed contract or share count.
    pub qty: f64,
    /// Observed mark per contract.
    pub current_price: f64,
    /// Spot of the option's underlying.
    pub underlying_price: f64,
    /// Factor index driving this instrument.
    pub underlying_index: u32,
    pub strike: f64,
    /// Years to expiry.
    pub time_to_maturity: f64,
    /// Annualized volatility.
    pub implied_vol: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
}

impl Instrument {
    /// Convenience constructor for a delta-one equity position.
    pub fn equity(id: u32, qty: f64, price: f64) -> Self {
        Self {
            id,
            kind: InstrumentKind::Equity,
            is_call: false,
            qty,
            current_price: price,
            underlying_price: price,
            underlying_index: id,
            strike: 0.0,
            time_to_maturity: 0.0,
            implied_vol: 0.0,
            rate: 0.0,
        }
    }
}

/// Column-oriented instrument container.
///
/// All vectors share the same length; `len()` is the row count. Equity rows
/// are canonicalized on insertion (`is_call` false, zero strike/expiry/vol,
/// `underlying_index = id`, `underlying_price = current_price`) and option
/// rows have their volatility floored at [`MIN_IMPLIED_VOL`].
#[derive(Debug, Clone, Default)]
pub struct InstrumentBook {
    pub id: Vec<u32>,
    pub kind: Vec<InstrumentKind>,
    pub is_call: Vec<bool>,
    pub qty: Vec<f64>,
    pub current_price: Vec<f64>,
    pub underlying_price: Vec<f64>,
    pub underlying_index: Vec<u32>,
    pub strike: Vec<f64>,
    pub time_to_maturity: Vec<f64>,
    pub implied_vol: Vec<f64>,
    pub rate: Vec<f64>,
}

impl InstrumentBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        let mut book = Self::default();
        book.reserve(n);
        book
    }

    pub fn reserve(&mut self, n: usize) {
        self.id.reserve(n);
        self.kind.reserve(n);
        self.is_call.reserve(n);
        self.qty.reserve(n);
        self.current_price.reserve(n);
        self.underlying_price.reserve(n);
        self.underlying_index.reserve(n);
        self.strike.reserve(n);
        self.time_to_maturity.reserve(n);
        self.implied_vol.reserve(n);
        self.rate.reserve(n);
    }

    pub fn len(&self) -> usize {
        self.id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    /// Number of option rows.
    pub fn option_count(&self) -> usize {
        self.kind.iter().filter(|k| k.is_option()).count()
    }

    /// Appends one row, canonicalizing per the instrument kind.
    pub fn push(&mut self, inst: Instrument) {
        match inst.kind {
            InstrumentKind::Equity => {
                self.id.push(inst.id);
                self.kind.push(InstrumentKind::Equity);
                self.is_call.push(false);
                self.qty.push(inst.qty);
                self.current_price.push(inst.current_price);
                self.underlying_price.push(inst.current_price);
                self.underlying_index.push(inst.id);
                self.strike.push(0.0);
                self.time_to_maturity.push(0.0);
                self.implied_vol.push(0.0);
                self.rate.push(0.0);
            }
            InstrumentKind::Option => {
                self.id.push(inst.id);
                self.kind.push(InstrumentKind::Option);
                self.is_call.push(inst.is_call);
                self.qty.push(inst.qty);
                self.current_price.push(inst.current_price);
                self.underlying_price.push(inst.underlying_price);
                self.underlying_index.push(inst.underlying_index);
                self.strike.push(inst.strike);
                self.time_to_maturity.push(inst.time_to_maturity.max(0.0));
                self.implied_vol.push(inst.implied_vol.max(MIN_IMPLIED_VOL));
                self.rate.push(inst.rate);
            }
        }
    }

    /// Builds the column layout from row-oriented instruments.
    pub fn from_instruments(instruments: &[Instrument]) -> Self {
        let mut book = Self::with_capacity(instruments.len());
        for inst in instruments {
            book.push(*inst);
        }
        book
    }

    /// Largest factor index referenced by any row, if the book is
    /// non-empty. Useful for loader-side bounds checks.
    pub fn max_factor_index(&self) -> Option<u32> {
        self.id
            .iter()
            .chain(self.underlying_index.iter())
            .copied()
            .max()
    }
}
