//! CSV file data adapter.
//!
//! Prices live in `<data_dir>/<TICKER>.csv`, fundamentals in
//! `<data_dir>/fundamentals.csv`.

use crate::domain::error::ScannerError;
use crate::domain::fundamentals::{Fundamentals, FundamentalsTable};
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const FUNDAMENTALS_FILE: &str = "fundamentals.csv";

#[derive(Debug, Deserialize)]
struct PriceRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

#[derive(Debug, Deserialize)]
struct FundamentalsRow {
    ticker: String,
    roe: f64,
    debt_to_equity: f64,
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    /// Reads `fundamentals.csv`; a missing file yields an empty table.
    pub fn load_fundamentals(&self) -> Result<FundamentalsTable, ScannerError> {
        let path = self.base_path.join(FUNDAMENTALS_FILE);
        let Some(content) = read_optional(&path)? else {
            log::warn!("{} not found, no fundamentals loaded", path.display());
            return Ok(FundamentalsTable::new());
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut table = FundamentalsTable::new();
        for result in rdr.deserialize::<FundamentalsRow>() {
            let row = result.map_err(|e| ScannerError::Data {
                reason: format!("{}: {}", path.display(), e),
            })?;
            let ticker = row.ticker.trim();
            if ticker.is_empty() {
                continue;
            }
            table.insert(ticker, Fundamentals::new(row.roe, row.debt_to_equity));
        }
        log::info!("Loaded fundamentals for {} tickers", table.len());
        Ok(table)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, ScannerError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ScannerError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        }),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ScannerError> {
        let path = self.csv_path(ticker);
        let Some(content) = read_optional(&path)? else {
            return Ok(Vec::new());
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.deserialize::<PriceRow>() {
            let row = result.map_err(|e| ScannerError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d").map_err(|e| {
                ScannerError::Data {
                    reason: format!("invalid date format '{}': {}", row.date, e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(OhlcvBar {
                ticker: ticker.to_string(),
                date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume.round() as i64,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
