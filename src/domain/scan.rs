//! The scan pipeline: fetch, compute indicators, quality filter, rank.
//!
//! Every call starts from freshly fetched bars; nothing is carried between
//! runs.

use crate::domain::config_validation::{check_lookback, parse_date};
use crate::domain::error::ScannerError;
use crate::domain::filter::{
    DEFAULT_DEBT_TO_EQUITY_THRESHOLD, DEFAULT_ROE_THRESHOLD, FilterOutcome, QualityFilter,
    apply_quality_filters,
};
use crate::domain::index::{
    DEFAULT_INDEX, MarketIndex, SkippedTicker, find_index, resolve_constituents,
    validate_universe,
};
use crate::domain::ranking::{DEFAULT_TOP_N, Ranking, rank_tickers};
use crate::domain::ticker_data::TickerData;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::fundamentals_port::FundamentalsPort;
use chrono::{Duration, NaiveDate};

/// Calendar days in the default one-year window.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub index: MarketIndex,
    pub constituents: Vec<String>,
    pub filter: QualityFilter,
    pub top_n: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ScanConfig {
    /// One-year window ending at `end_date`, default filter and top 5.
    pub fn new(index: MarketIndex, constituents: Vec<String>, end_date: NaiveDate) -> Self {
        Self {
            index,
            constituents,
            filter: QualityFilter::default(),
            top_n: DEFAULT_TOP_N,
            start_date: end_date - Duration::days(DEFAULT_LOOKBACK_DAYS),
            end_date,
        }
    }

    /// Reads `[scan]` and `[universe]`, then applies command-line or form
    /// overrides. `today` is the end date when `end_date` is not configured.
    pub fn from_config(
        config: &dyn ConfigPort,
        overrides: &ScanOverrides,
        today: NaiveDate,
    ) -> Result<Self, ScannerError> {
        let index = match overrides
            .index
            .clone()
            .or_else(|| config.get_string("scan", "index"))
        {
            Some(name) => find_index(&name)?,
            None => DEFAULT_INDEX,
        };
        let constituents = resolve_constituents(&index, config)?;

        let roe_threshold = overrides.roe_threshold.unwrap_or_else(|| {
            config.get_double("scan", "roe_threshold", DEFAULT_ROE_THRESHOLD)
        });
        let debt_to_equity_threshold = overrides.debt_to_equity_threshold.unwrap_or_else(|| {
            config.get_double(
                "scan",
                "debt_to_equity_threshold",
                DEFAULT_DEBT_TO_EQUITY_THRESHOLD,
            )
        });
        for (key, value) in [
            ("roe_threshold", roe_threshold),
            ("debt_to_equity_threshold", debt_to_equity_threshold),
        ] {
            if !value.is_finite() {
                return Err(ScannerError::ConfigInvalid {
                    section: "scan".to_string(),
                    key: key.to_string(),
                    reason: format!("{} must be a finite number", key),
                });
            }
        }

        let top_n = match overrides.top_n {
            Some(n) => n as i64,
            None => config.get_int("scan", "top_n", DEFAULT_TOP_N as i64),
        };
        if top_n < 1 {
            return Err(ScannerError::ConfigInvalid {
                section: "scan".to_string(),
                key: "top_n".to_string(),
                reason: "top_n must be a positive integer".to_string(),
            });
        }

        let end_date = match config.get_string("scan", "end_date") {
            Some(raw) => parse_date(&raw, "end_date")?,
            None => today,
        };
        let lookback = config.get_int("scan", "lookback_days", DEFAULT_LOOKBACK_DAYS);
        check_lookback(lookback)?;
        let start_date = Duration::try_days(lookback)
            .and_then(|window| end_date.checked_sub_signed(window))
            .ok_or_else(|| ScannerError::ConfigInvalid {
                section: "scan".to_string(),
                key: "lookback_days".to_string(),
                reason: format!("{} days before {} is out of range", lookback, end_date),
            })?;

        Ok(Self {
            index,
            constituents,
            filter: QualityFilter::new(roe_threshold, debt_to_equity_threshold),
            top_n: top_n as usize,
            start_date,
            end_date,
        })
    }
}

/// Values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ScanOverrides {
    pub index: Option<String>,
    pub roe_threshold: Option<f64>,
    pub debt_to_equity_threshold: Option<f64>,
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ScanResult {
    pub index: MarketIndex,
    pub filter: QualityFilter,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// The index's own series with indicator columns.
    pub index_data: TickerData,
    pub filtered: FilterOutcome,
    pub ranking: Ranking,
    pub skipped: Vec<SkippedTicker>,
}

impl ScanResult {
    /// Tables of the ranked tickers, in rank order.
    pub fn top_tickers(&self) -> Vec<&TickerData> {
        self.ranking
            .top
            .iter()
            .filter_map(|r| self.filtered.kept.iter().find(|td| td.ticker == r.ticker))
            .collect()
    }
}

pub fn run_scan(
    data_port: &dyn DataPort,
    fundamentals_port: &dyn FundamentalsPort,
    config: &ScanConfig,
) -> Result<ScanResult, ScannerError> {
    log::info!(
        "Scanning {} ({}) from {} to {}",
        config.index.name,
        config.index.symbol,
        config.start_date,
        config.end_date
    );

    // Stage 1: index series
    let index_bars = data_port.fetch_ohlcv(config.index.symbol, config.start_date, config.end_date)?;
    if index_bars.is_empty() {
        return Err(ScannerError::NoData {
            ticker: config.index.symbol.to_string(),
        });
    }
    let index_data =
        TickerData::with_momentum_indicators(config.index.symbol.to_string(), index_bars);

    // Stage 2: constituents
    log::info!("Fetching {} tickers...", config.constituents.len());
    let universe = validate_universe(
        data_port,
        &config.constituents,
        config.start_date,
        config.end_date,
    )?;

    // Stage 3: indicators and fundamentals
    let mut tickers = Vec::with_capacity(universe.bars.len());
    for (ticker, bars) in universe.bars {
        let mut td = TickerData::with_momentum_indicators(ticker, bars);
        td.fundamentals = match fundamentals_port.fetch_fundamentals(&td.ticker) {
            Ok(f) => f,
            Err(e) => {
                log::warn!("{}: fundamentals unavailable ({})", td.ticker, e);
                None
            }
        };
        tickers.push(td);
    }

    // Stage 4: quality filter
    let filtered = apply_quality_filters(tickers, &config.filter);
    log::info!(
        "{} of {} tickers pass ROE > {} and Debt/Equity < {}",
        filtered.kept.len(),
        filtered.kept.len() + filtered.excluded.len(),
        config.filter.roe_threshold,
        config.filter.debt_to_equity_threshold
    );

    // Stage 5: rank
    let ranking = rank_tickers(&filtered.kept, config.top_n);

    Ok(ScanResult {
        index: config.index,
        filter: config.filter,
        start_date: config.start_date,
        end_date: config.end_date,
        index_data,
        filtered,
        ranking,
        skipped: universe.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fundamentals::{Fundamentals, FundamentalsTable};
    use crate::domain::index::SkipReason;
    use crate::domain::ohlcv::OhlcvBar;
    use std::collections::HashMap;

    struct MapDataPort(HashMap<String, Vec<OhlcvBar>>);

    impl DataPort for MapDataPort {
        fn fetch_ohlcv(
            &self,
            ticker: &str,
            start_date: NaiveDate,
            end_date: NaiveDate,
        ) -> Result<Vec<OhlcvBar>, ScannerError> {
            Ok(self
                .0
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

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn generate(ticker: &str, count: usize, step: f64) -> Vec<OhlcvBar> {
        (0..count)
            .map(|i| {
                let close = 100.0 + step * i as f64 + (i % 4) as f64 * 0.3;
                OhlcvBar {
                    ticker: ticker.into(),
                    date: end() - Duration::days((count - 1 - i) as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1000 + (i as i64 % 3) * 100,
                }
            })
            .collect()
    }

    fn port() -> MapDataPort {
        let mut data = HashMap::new();
        data.insert("^NSEI".to_string(), generate("^NSEI", 120, 0.2));
        data.insert("FAST.NS".to_string(), generate("FAST.NS", 120, 1.0));
        data.insert("SLOW.NS".to_string(), generate("SLOW.NS", 120, 0.1));
        data.insert("DEBT.NS".to_string(), generate("DEBT.NS", 120, 2.0));
        data.insert("NEW.NS".to_string(), generate("NEW.NS", 10, 1.0));
        MapDataPort(data)
    }

    fn fundamentals() -> FundamentalsTable {
        FundamentalsTable::new()
            .with("FAST.NS", Fundamentals::new(25.0, 0.3))
            .with("SLOW.NS", Fundamentals::new(15.0, 0.2))
            .with("DEBT.NS", Fundamentals::new(30.0, 3.0))
    }

    fn config(tickers: &[&str]) -> ScanConfig {
        ScanConfig::new(
            DEFAULT_INDEX,
            tickers.iter().map(|t| t.to_string()).collect(),
            end(),
        )
    }

    #[test]
    fn default_window_is_one_year() {
        let cfg = config(&[]);
        assert_eq!(cfg.start_date, NaiveDate::from_ymd_opt(2023, 7, 1).unwrap());
        assert_eq!(cfg.top_n, 5);
    }

    #[test]
    fn from_config_reads_scan_section() {
        let config = crate::adapters::file_config_adapter::FileConfigAdapter::from_string(
            "[scan]\nindex = Nifty IT\nroe_threshold = 15\ntop_n = 3\nlookback_days = 100\nend_date = 2024-06-30\n\n[universe]\nnifty_it = INFY.NS, TCS.NS\n",
        )
        .unwrap();
        let cfg = ScanConfig::from_config(&config, &ScanOverrides::default(), end() + Duration::days(9))
            .unwrap();

        assert_eq!(cfg.index.symbol, "^CNXIT");
        assert_eq!(cfg.constituents, vec!["INFY.NS", "TCS.NS"]);
        assert_eq!(cfg.filter, QualityFilter::new(15.0, 1.0));
        assert_eq!(cfg.top_n, 3);
        assert_eq!(cfg.end_date, end());
        assert_eq!(cfg.start_date, end() - Duration::days(100));
    }

    #[test]
    fn overrides_beat_config() {
        let config = crate::adapters::file_config_adapter::FileConfigAdapter::from_string(
            "[scan]\nindex = Nifty IT\nroe_threshold = 15\n",
        )
        .unwrap();
        let overrides = ScanOverrides {
            index: Some("nifty_bank".into()),
            roe_threshold: Some(5.0),
            debt_to_equity_threshold: Some(2.0),
            top_n: Some(10),
        };
        let cfg = ScanConfig::from_config(&config, &overrides, end()).unwrap();

        assert_eq!(cfg.index.symbol, "^NSEBANK");
        assert_eq!(cfg.constituents, vec!["^NSEBANK"]);
        assert_eq!(cfg.filter, QualityFilter::new(5.0, 2.0));
        assert_eq!(cfg.top_n, 10);
        assert_eq!(cfg.end_date, end());
    }

    #[test]
    fn from_config_rejects_bad_overrides() {
        let config = crate::adapters::file_config_adapter::FileConfigAdapter::empty();
        let unknown = ScanOverrides {
            index: Some("Hang Seng".into()),
            ..Default::default()
        };
        assert!(matches!(
            ScanConfig::from_config(&config, &unknown, end()),
            Err(ScannerError::UnknownIndex { .. })
        ));

        let nan = ScanOverrides {
            roe_threshold: Some(f64::NAN),
            ..Default::default()
        };
        assert!(matches!(
            ScanConfig::from_config(&config, &nan, end()),
            Err(ScannerError::ConfigInvalid { .. })
        ));

        let zero = ScanOverrides {
            top_n: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            ScanConfig::from_config(&config, &zero, end()),
            Err(ScannerError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn from_config_rejects_out_of_range_lookback() {
        for raw in ["100000000", "-5", "10"] {
            let config = crate::adapters::file_config_adapter::FileConfigAdapter::from_string(
                &format!("[scan]\nlookback_days = {}\n", raw),
            )
            .unwrap();
            match ScanConfig::from_config(&config, &ScanOverrides::default(), end()) {
                Err(ScannerError::ConfigInvalid { key, .. }) => assert_eq!(key, "lookback_days"),
                other => panic!("lookback_days = {raw} accepted: {other:?}"),
            }
        }
    }

    #[test]
    fn full_pipeline_ranks_quality_tickers() {
        let result = run_scan(
            &port(),
            &fundamentals(),
            &config(&["FAST.NS", "SLOW.NS", "DEBT.NS", "NEW.NS", "MISSING.NS"]),
        )
        .unwrap();

        assert_eq!(result.index_data.bar_count(), 120);
        assert_eq!(result.filtered.kept.len(), 2);
        assert_eq!(result.filtered.excluded.len(), 1);
        assert_eq!(result.filtered.excluded[0].ticker, "DEBT.NS");

        let ranked: Vec<&str> = result.ranking.top.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(ranked, vec!["FAST.NS", "SLOW.NS"]);

        let skipped: Vec<(&str, &SkipReason)> = result
            .skipped
            .iter()
            .map(|s| (s.ticker.as_str(), &s.reason))
            .collect();
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0], ("NEW.NS", &SkipReason::InsufficientBars { bars: 10 }));
        assert_eq!(skipped[1], ("MISSING.NS", &SkipReason::NoData));

        let top = result.top_tickers();
        assert_eq!(top[0].ticker, "FAST.NS");
    }

    #[test]
    fn missing_index_series_is_no_data() {
        let mut cfg = config(&["FAST.NS"]);
        cfg.index = crate::domain::index::find_index("Nifty IT").unwrap();
        let err = run_scan(&port(), &fundamentals(), &cfg).unwrap_err();
        assert!(matches!(err, ScannerError::NoData { ticker } if ticker == "^CNXIT"));
    }

    #[test]
    fn all_tickers_skipped_is_insufficient_data() {
        let err = run_scan(&port(), &fundamentals(), &config(&["NEW.NS"])).unwrap_err();
        assert!(matches!(err, ScannerError::InsufficientData { .. }));
    }

    #[test]
    fn stricter_filter_changes_ranking() {
        let mut cfg = config(&["FAST.NS", "SLOW.NS", "DEBT.NS"]);
        cfg.filter = QualityFilter::new(20.0, 5.0);
        let result = run_scan(&port(), &fundamentals(), &cfg).unwrap();

        let ranked: Vec<&str> = result.ranking.top.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(ranked, vec!["DEBT.NS", "FAST.NS"]);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let cfg = config(&["FAST.NS", "SLOW.NS"]);
        let first = run_scan(&port(), &fundamentals(), &cfg).unwrap();
        let second = run_scan(&port(), &fundamentals(), &cfg).unwrap();
        assert_eq!(first.ranking.top, second.ranking.top);
    }
}
