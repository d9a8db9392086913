#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use momentum_scanner::domain::error::ScannerError;
use momentum_scanner::domain::fundamentals::{Fundamentals, FundamentalsTable};
pub use momentum_scanner::domain::ohlcv::OhlcvBar;
use momentum_scanner::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ScannerError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(ScannerError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_bar(ticker: &str, day: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        ticker: ticker.to_string(),
        date: date(day),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 10_000,
    }
}

/// `count` consecutive daily bars drifting by `step` per day, with a small
/// five-day wobble so gains, losses and directional movement all occur.
pub fn generate_bars(
    ticker: &str,
    start: &str,
    count: usize,
    start_price: f64,
    step: f64,
) -> Vec<OhlcvBar> {
    let first = date(start);
    (0..count)
        .map(|i| {
            let close = start_price + step * i as f64 + ((i % 5) as f64 - 2.0) * 0.5;
            OhlcvBar {
                ticker: ticker.to_string(),
                date: first + Duration::days(i as i64),
                open: close - 0.2,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 10_000 + ((i % 7) as i64) * 500,
            }
        })
        .collect()
}

pub fn fundamentals(entries: &[(&str, f64, f64)]) -> FundamentalsTable {
    entries
        .iter()
        .fold(FundamentalsTable::new(), |table, &(ticker, roe, de)| {
            table.with(ticker, Fundamentals::new(roe, de))
        })
}

/// Writes `<TICKER>.csv` in the layout the CSV adapter reads.
pub fn write_price_csv(dir: &std::path::Path, bars: &[OhlcvBar]) {
    let Some(first) = bars.first() else {
        return;
    };
    let mut body = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        body.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", first.ticker)), body).unwrap();
}
