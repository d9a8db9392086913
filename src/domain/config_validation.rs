//! Configuration validation.
//!
//! Validates all config fields before a scan runs.

use crate::domain::error::ScannerError;
use crate::domain::fundamentals::Fundamentals;
use crate::domain::index::{MIN_OHLCV_BARS, find_index, parse_tickers};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

pub const DATA_SOURCES: [&str; 2] = ["yahoo", "csv"];

pub fn validate_scan_config(config: &dyn ConfigPort) -> Result<(), ScannerError> {
    validate_index(config)?;
    validate_thresholds(config)?;
    validate_top_n(config)?;
    validate_lookback(config)?;
    validate_end_date(config)?;
    validate_data_source(config)?;
    validate_universe_section(config)?;
    validate_fundamentals(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> ScannerError {
    ScannerError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_index(config: &dyn ConfigPort) -> Result<(), ScannerError> {
    if let Some(name) = config.get_string("scan", "index") {
        find_index(&name).map_err(|_| invalid("scan", "index", format!("unknown index '{}'", name)))?;
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), ScannerError> {
    for key in ["roe_threshold", "debt_to_equity_threshold"] {
        if let Some(raw) = config.get_string("scan", key) {
            match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => {}
                _ => return Err(invalid("scan", key, format!("{} must be a finite number", key))),
            }
        }
    }
    Ok(())
}

fn validate_top_n(config: &dyn ConfigPort) -> Result<(), ScannerError> {
    if config.get_string("scan", "top_n").is_some() && config.get_int("scan", "top_n", 0) < 1 {
        return Err(invalid("scan", "top_n", "top_n must be a positive integer"));
    }
    Ok(())
}

fn validate_lookback(config: &dyn ConfigPort) -> Result<(), ScannerError> {
    if config.get_string("scan", "lookback_days").is_some() {
        check_lookback(config.get_int("scan", "lookback_days", 0))?;
    }
    Ok(())
}

/// `days` must cover the slowest indicator and stay within a century.
pub fn check_lookback(days: i64) -> Result<(), ScannerError> {
    if !(MIN_OHLCV_BARS as i64..=MAX_LOOKBACK_DAYS).contains(&days) {
        return Err(invalid(
            "scan",
            "lookback_days",
            format!(
                "lookback_days must be between {} and {}",
                MIN_OHLCV_BARS, MAX_LOOKBACK_DAYS
            ),
        ));
    }
    Ok(())
}

fn validate_end_date(config: &dyn ConfigPort) -> Result<(), ScannerError> {
    if let Some(raw) = config.get_string("scan", "end_date") {
        parse_date(&raw, "end_date")?;
    }
    Ok(())
}

fn validate_data_source(config: &dyn ConfigPort) -> Result<(), ScannerError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "yahoo".to_string())
        .to_lowercase();
    if !DATA_SOURCES.contains(&source.as_str()) {
        return Err(invalid(
            "data",
            "source",
            format!("source must be one of {}", DATA_SOURCES.join(", ")),
        ));
    }
    Ok(())
}

fn validate_universe_section(config: &dyn ConfigPort) -> Result<(), ScannerError> {
    for (key, value) in config.section_entries("universe") {
        find_index(&key).map_err(|_| invalid("universe", &key, "not a known index slug"))?;
        parse_tickers(&value).map_err(|e| invalid("universe", &key, e.to_string()))?;
    }
    Ok(())
}

fn validate_fundamentals(config: &dyn ConfigPort) -> Result<(), ScannerError> {
    for (key, value) in config.section_entries("fundamentals") {
        if Fundamentals::parse_pair(&value).is_none() {
            return Err(invalid(
                "fundamentals",
                &key,
                "expected 'roe, debt_to_equity'",
            ));
        }
    }
    Ok(())
}

pub fn parse_date(raw: &str, key: &str) -> Result<NaiveDate, ScannerError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| invalid("scan", key, "invalid date format (expected YYYY-MM-DD)"))
}
