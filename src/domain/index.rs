//! Index catalogue and constituent universe.
//!
//! Parses ticker lists from configuration and validates that each ticker has
//! enough history for the slowest indicator column.

use crate::domain::error::ScannerError;
use crate::domain::indicator_helpers::SMA_LONG;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashSet;

pub const MIN_OHLCV_BARS: usize = SMA_LONG;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketIndex {
    pub name: &'static str,
    pub symbol: &'static str,
}

impl MarketIndex {
    /// Lower-case name with spaces as underscores, e.g. `nifty_next_50`.
    pub fn slug(&self) -> String {
        self.name.to_lowercase().replace(' ', "_")
    }
}

pub const INDICES: [MarketIndex; 18] = [
    MarketIndex { name: "Nifty 50", symbol: "^NSEI" },
    MarketIndex { name: "Nifty Next 50", symbol: "^NSENEXT50" },
    MarketIndex { name: "Nifty 100", symbol: "^CNX100" },
    MarketIndex { name: "Nifty 200", symbol: "^CNX200" },
    MarketIndex { name: "Nifty 500", symbol: "^CNX500" },
    MarketIndex { name: "Nifty Midcap 50", symbol: "^CNXMID50" },
    MarketIndex { name: "Nifty Midcap 100", symbol: "^CNXMID100" },
    MarketIndex { name: "Nifty Midcap 150", symbol: "^CNXMID150" },
    MarketIndex { name: "Nifty Smallcap 50", symbol: "^CNXSMCAP50" },
    MarketIndex { name: "Nifty Smallcap 100", symbol: "^CNXSMCAP100" },
    MarketIndex { name: "Nifty Smallcap 250", symbol: "^CNXSMCAP250" },
    MarketIndex { name: "Nifty IT", symbol: "^CNXIT" },
    MarketIndex { name: "Nifty Pharma", symbol: "^CNXPHARMA" },
    MarketIndex { name: "Nifty Bank", symbol: "^NSEBANK" },
    MarketIndex { name: "Nifty FMCG", symbol: "^CNXFMCG" },
    MarketIndex { name: "Nifty Auto", symbol: "^CNXAUTO" },
    MarketIndex { name: "Nifty Energy", symbol: "^CNXENERGY" },
    MarketIndex { name: "Nifty Realty", symbol: "^CNXREALTY" },
];

pub const DEFAULT_INDEX: MarketIndex = INDICES[0];

/// Case-insensitive lookup by display name, slug or symbol.
pub fn find_index(query: &str) -> Result<MarketIndex, ScannerError> {
    let q = query.trim();
    INDICES
        .iter()
        .find(|idx| {
            idx.name.eq_ignore_ascii_case(q)
                || idx.symbol.eq_ignore_ascii_case(q)
                || idx.slug() == q.to_lowercase()
        })
        .copied()
        .ok_or_else(|| ScannerError::UnknownIndex {
            name: q.to_string(),
        })
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum UniverseError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),
}

pub fn parse_tickers(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let ticker = trimmed.to_uppercase();
        if !seen.insert(ticker.clone()) {
            return Err(UniverseError::DuplicateTicker(ticker));
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}

/// Constituents configured under `[universe]`, falling back to the index itself.
pub fn resolve_constituents(
    index: &MarketIndex,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, ScannerError> {
    match config
        .get_string("universe", &index.slug())
        .filter(|s| !s.trim().is_empty())
    {
        Some(list) => parse_tickers(&list).map_err(ScannerError::from),
        None => Ok(vec![index.symbol.to_string()]),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoData,
    FetchFailed { reason: String },
    InsufficientBars { bars: usize },
}

#[derive(Debug, Clone)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: SkipReason,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoData => write!(f, "no data found"),
            SkipReason::FetchFailed { reason } => write!(f, "{}", reason),
            SkipReason::InsufficientBars { bars } => write!(
                f,
                "only {} bars, minimum {} required",
                bars, MIN_OHLCV_BARS
            ),
        }
    }
}

pub struct UniverseFetch {
    pub bars: Vec<(String, Vec<crate::domain::ohlcv::OhlcvBar>)>,
    pub skipped: Vec<SkippedTicker>,
}

/// Fetches every ticker once, keeping those with at least `MIN_OHLCV_BARS`.
pub fn validate_universe(
    data_port: &dyn DataPort,
    tickers: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<UniverseFetch, ScannerError> {
    let mut bars = Vec::new();
    let mut skipped = Vec::new();

    for ticker in tickers {
        let reason = match data_port.fetch_ohlcv(ticker, start_date, end_date) {
            Err(e) => SkipReason::FetchFailed {
                reason: e.to_string(),
            },
            Ok(ohlcv) if ohlcv.is_empty() => SkipReason::NoData,
            Ok(ohlcv) if ohlcv.len() < MIN_OHLCV_BARS => SkipReason::InsufficientBars {
                bars: ohlcv.len(),
            },
            Ok(ohlcv) => {
                log::info!("  {}: {} bars [OK]", ticker, ohlcv.len());
                bars.push((ticker.clone(), ohlcv));
                continue;
            }
        };
        log::warn!("skipping {} ({})", ticker, reason);
        skipped.push(SkippedTicker {
            ticker: ticker.clone(),
            reason,
        });
    }

    if bars.is_empty() {
        return Err(ScannerError::InsufficientData {
            ticker: "all".to_string(),
            bars: 0,
            minimum: MIN_OHLCV_BARS,
        });
    }

    if !skipped.is_empty() {
        log::info!("Scanning {} of {} tickers", bars.len(), tickers.len());
    }

    Ok(UniverseFetch { bars, skipped })
}
