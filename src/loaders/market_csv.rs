//! Market-closes table loader and shock derivation.
//!
//! The closes table is row-major with a leading `date` label column and one
//! strictly-positive close column per ticker; the header order defines the
//! factor universe. Shocks are arithmetic day-over-day returns
//! `price_t / price_{t-1} - 1` computed column-wise, giving a
//! `(T - 1) x U` row-major matrix.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::core::{Result, RiskError};
use crate::loaders::{LoaderError, LoaderResult};
use crate::universe::Universe;

/// Validated market observations.
#[derive(Debug, Clone)]
pub struct MarketData {
    /// One opaque date label per observation row.
    pub dates: Vec<String>,
    /// Factor universe in header order.
    pub universe: Universe,
    /// Row-major `rows() x universe.len()` close prices.
    pub closes_flat: Vec<f64>,
}

impl MarketData {
    /// Number of observation rows.
    pub fn rows(&self) -> usize {
        self.dates.len()
    }
}

/// Reads and validates a closes table from any byte source.
pub fn read_closes<R: Read>(reader: R) -> LoaderResult<MarketData> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let header = csv_reader.headers()?.clone();
    if header.len() < 2 {
        return Err(LoaderError::Malformed {
            row: 1,
            msg: "closes header needs a date column and at least one ticker".to_string(),
        });
    }
    if &header[0] != "date" {
        return Err(LoaderError::Malformed {
            row: 1,
            msg: format!("first header column must be 'date', got '{}'", &header[0]),
        });
    }

    let tickers: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
    let universe = Universe::from_symbols(tickers)?;
    let factors = universe.len();

    let mut dates = Vec::new();
    let mut closes_flat = Vec::new();
    for (record_index, record) in csv_reader.records().enumerate() {
        let row = record_index + 2;
        let record = record?;
        if record.len() != factors + 1 {
            return Err(LoaderError::Malformed {
                row,
                msg: format!("expected {} fields, got {}", factors + 1, record.len()),
            });
        }

        dates.push(record[0].to_string());
        for (col, field) in record.iter().skip(1).enumerate() {
            let value: f64 = field.parse().map_err(|_| LoaderError::Malformed {
                row,
                msg: format!(
                    "close for '{}' is not a number: '{field}'",
                    universe.symbol(col).unwrap_or("?")
                ),
            })?;
            if !value.is_finite() || value <= 0.0 {
                return Err(LoaderError::Malformed {
                    row,
                    msg: format!(
                        "close for '{}' must be a positive finite number, got {value}",
                        universe.symbol(col).unwrap_or("?")
                    ),
                });
            }
            closes_flat.push(value);
        }
    }

    if dates.is_empty() {
        return Err(LoaderError::Malformed {
            row: 1,
            msg: "closes table has no data rows".to_string(),
        });
    }

    debug!(
        rows = dates.len(),
        tickers = factors,
        "loaded market closes"
    );
    Ok(MarketData {
        dates,
        universe,
        closes_flat,
    })
}

/// Reads a closes table from a file path.
pub fn load_closes_csv<P: AsRef<Path>>(path: P) -> LoaderResult<MarketData> {
    read_closes(File::open(path)?)
}

/// Derives the `(rows - 1) x cols` arithmetic-return shock matrix from a
/// row-major close-price matrix.
pub fn compute_shocks(closes_flat: &[f64], rows: usize, cols: usize) -> Result<Vec<f64>> {
    if cols == 0 {
        return Err(RiskError::InvalidArgument(
            "shock derivation requires a positive factor dimension".to_string(),
        ));
    }
    if rows < 2 {
        return Err(RiskError::InvalidArgument(
            "shock derivation requires at least two observations".to_string(),
        ));
    }
    if closes_flat.len() != rows * cols {
        return Err(RiskError::InvalidArgument(format!(
            "price matrix has {} entries, expected {rows} x {cols}",
            closes_flat.len()
        )));
    }

    let mut shocks = vec![0.0_f64; (rows - 1) * cols];
    for t in 1..rows {
        let prev = &closes_flat[(t - 1) * cols..t * cols];
        let curr = &closes_flat[t * cols..(t + 1) * cols];
        let out = &mut shocks[(t - 1) * cols..t * cols];
        for ((shock, &base), &current) in out.iter_mut().zip(prev).zip(curr) {
            if base <= 0.0 {
                return Err(RiskError::InvalidArgument(
                    "non-positive base price while computing shocks".to_string(),
                ));
            }
            *shock = current / base - 1.0;
        }
    }
    Ok(shocks)
}
