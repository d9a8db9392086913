//! Per-ticker fundamental ratios used by the quality filter.

use crate::domain::error::ScannerError;
use crate::ports::config_port::ConfigPort;
use crate::ports::fundamentals_port::FundamentalsPort;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fundamentals {
    /// Return on equity, in percent.
    pub roe: f64,
    pub debt_to_equity: f64,
}

impl Fundamentals {
    pub fn new(roe: f64, debt_to_equity: f64) -> Self {
        Self {
            roe,
            debt_to_equity,
        }
    }

    /// Parses `"roe, debt_to_equity"`.
    pub fn parse_pair(input: &str) -> Option<Self> {
        let mut parts = input.split(',').map(str::trim);
        let roe = parts.next()?.parse::<f64>().ok()?;
        let de = parts.next()?.parse::<f64>().ok()?;
        if parts.next().is_some() || !roe.is_finite() || !de.is_finite() {
            return None;
        }
        Some(Self::new(roe, de))
    }
}

/// Fixed ticker -> fundamentals table, keyed by upper-cased ticker.
#[derive(Debug, Clone, Default)]
pub struct FundamentalsTable {
    entries: HashMap<String, Fundamentals>,
}

impl FundamentalsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ticker: &str, fundamentals: Fundamentals) -> Self {
        self.insert(ticker, fundamentals);
        self
    }

    pub fn insert(&mut self, ticker: &str, fundamentals: Fundamentals) {
        self.entries.insert(ticker.to_uppercase(), fundamentals);
    }

    /// Reads the `[fundamentals]` section: `TICKER = roe, debt_to_equity`.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, ScannerError> {
        let mut table = Self::new();
        for (ticker, value) in config.section_entries("fundamentals") {
            let fundamentals =
                Fundamentals::parse_pair(&value).ok_or_else(|| ScannerError::ConfigInvalid {
                    section: "fundamentals".to_string(),
                    key: ticker.clone(),
                    reason: "expected 'roe, debt_to_equity'".to_string(),
                })?;
            table.insert(&ticker, fundamentals);
        }
        log::debug!("loaded fundamentals for {} tickers", table.len());
        Ok(table)
    }

    /// Entries of `other` replace entries of `self` for the same ticker.
    pub fn merge(mut self, other: FundamentalsTable) -> Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FundamentalsPort for FundamentalsTable {
    fn fetch_fundamentals(&self, ticker: &str) -> Result<Option<Fundamentals>, ScannerError> {
        Ok(self.entries.get(&ticker.to_uppercase()).copied())
    }
}
