//! Portfolio table loader.
//!
//! The portfolio table carries exactly eleven columns in fixed order:
//! `id, type, is_call, qty, current_price, underlying_price,
//! underlying_index, strike, time_to_maturity, implied_vol, rate`.
//! Option rows must fill every option field; equity rows may leave them
//! blank and are canonicalized on insertion into the book.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::core::InstrumentKind;
use crate::instruments::{Instrument, InstrumentBook};
use crate::loaders::{LoaderError, LoaderResult};

const PORTFOLIO_COLUMNS: [&str; 11] = [
    "id",
    "type",
    "is_call",
    "qty",
    "current_price",
    "underlying_price",
    "underlying_index",
    "strike",
    "time_to_maturity",
    "implied_vol",
    "rate",
];

#[derive(Debug, Deserialize)]
struct PortfolioRow {
    id: u32,
    #[serde(rename = "type")]
    kind: u8,
    is_call: Option<u8>,
    qty: f64,
    current_price: f64,
    underlying_price: Option<f64>,
    underlying_index: Option<u32>,
    strike: Option<f64>,
    time_to_maturity: Option<f64>,
    implied_vol: Option<f64>,
    rate: Option<f64>,
}

fn malformed(row: usize, msg: impl Into<String>) -> LoaderError {
    LoaderError::Malformed {
        row,
        msg: msg.into(),
    }
}

fn validate_row(raw: PortfolioRow, row: usize, universe_len: usize) -> LoaderResult<Instrument> {
    if (raw.id as usize) >= universe_len {
        return Err(malformed(
            row,
            format!("id {} outside the {universe_len}-factor universe", raw.id),
        ));
    }
    let kind = InstrumentKind::from_code(raw.kind)
        .ok_or_else(|| malformed(row, format!("type must be 0 or 1, got {}", raw.kind)))?;
    let is_option = kind.is_option();

    let is_call = match raw.is_call {
        Some(flag) if flag <= 1 => flag == 1,
        Some(flag) => {
            return Err(malformed(row, format!("is_call must be 0 or 1, got {flag}")));
        }
        None if is_option => {
            return Err(malformed(row, "options must set is_call"));
        }
        None => false,
    };

    if !raw.qty.is_finite() {
        return Err(malformed(row, "qty must be finite"));
    }
    if !raw.current_price.is_finite() || raw.current_price <= 0.0 {
        return Err(malformed(row, "current_price must be positive and finite"));
    }

    let underlying_price = match raw.underlying_price {
        Some(price) => price,
        None if is_option => {
            return Err(malformed(row, "options must set underlying_price"));
        }
        None => raw.current_price,
    };
    if !underlying_price.is_finite() || underlying_price <= 0.0 {
        return Err(malformed(
            row,
            "underlying_price must be positive and finite",
        ));
    }

    let underlying_index = match raw.underlying_index {
        Some(idx) => idx,
        None if is_option => {
            return Err(malformed(row, "options must set underlying_index"));
        }
        None => raw.id,
    };
    if !is_option && underlying_index != raw.id {
        return Err(malformed(row, "equity underlying_index must equal id"));
    }
    if (underlying_index as usize) >= universe_len {
        return Err(malformed(
            row,
            format!("underlying_index {underlying_index} outside the {universe_len}-factor universe"),
        ));
    }

    let strike = if is_option {
        let strike = raw
            .strike
            .ok_or_else(|| malformed(row, "options must set strike"))?;
        if !strike.is_finite() || strike <= 0.0 {
            return Err(malformed(row, "strike must be positive and finite"));
        }
        strike
    } else {
        0.0
    };

    let time_to_maturity = match raw.time_to_maturity {
        Some(ttm) if ttm.is_finite() => ttm.max(0.0),
        Some(_) => return Err(malformed(row, "time_to_maturity must be finite")),
        None if is_option => {
            return Err(malformed(row, "options must set time_to_maturity"));
        }
        None => 0.0,
    };

    let implied_vol = match raw.implied_vol {
        Some(vol) if vol.is_finite() => vol,
        Some(_) => return Err(malformed(row, "implied_vol must be finite")),
        None if is_option => {
            return Err(malformed(row, "options must set implied_vol"));
        }
        None => 0.0,
    };

    let rate = match raw.rate {
        Some(rate) if rate.is_finite() => rate,
        Some(_) => return Err(malformed(row, "rate must be finite")),
        None => 0.0,
    };

    Ok(Instrument {
        id: raw.id,
        kind,
        is_call,
        qty: raw.qty,
        current_price: raw.current_price,
        underlying_price,
        underlying_index,
        strike,
        time_to_maturity,
        implied_vol,
        rate,
    })
}

/// Reads and validates a portfolio table from any byte source, producing
/// the column-oriented book. `universe_len` bounds every factor index.
pub fn read_portfolio<R: Read>(reader: R, universe_len: usize) -> LoaderResult<InstrumentBook> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = csv_reader.headers()?.clone();
    if header.len() != PORTFOLIO_COLUMNS.len() {
        return Err(malformed(
            1,
            format!(
                "portfolio header has {} columns, expected {}",
                header.len(),
                PORTFOLIO_COLUMNS.len()
            ),
        ));
    }
    for (i, expected) in PORTFOLIO_COLUMNS.iter().enumerate() {
        if &header[i] != *expected {
            return Err(malformed(
                1,
                format!("header column {i} must be '{expected}', got '{}'", &header[i]),
            ));
        }
    }

    let mut book = InstrumentBook::new();
    for (record_index, record) in csv_reader.deserialize::<PortfolioRow>().enumerate() {
        let row = record_index + 2;
        let raw = record?;
        book.push(validate_row(raw, row, universe_len)?);
    }

    debug!(
        instruments = book.len(),
        options = book.option_count(),
        "loaded portfolio"
    );
    Ok(book)
}

/// Reads a portfolio table from a file path.
pub fn load_portfolio_csv<P: AsRef<Path>>(
    path: P,
    universe_len: usize,
) -> LoaderResult<InstrumentBook> {
    read_portfolio(File::open(path)?, universe_len)
}
