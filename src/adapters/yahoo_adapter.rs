//! Yahoo Finance chart API adapter.
//!
//! Daily bars from `query1.finance.yahoo.com/v8/finance/chart/{symbol}`.
//! Rows with any missing field are dropped.

use crate::domain::error::ScannerError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use serde::Deserialize;
use std::time::Duration as StdDuration;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Quote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new() -> Result<Self, ScannerError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ScannerError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0")
            .timeout(StdDuration::from_secs(30))
            .build()
            .map_err(|e| ScannerError::Data {
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, ticker: &str, start_date: NaiveDate, end_date: NaiveDate) -> String {
        let period1 = start_date.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = (end_date + Duration::days(1))
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();
        format!(
            "{}/{}?period1={}&period2={}&interval=1d",
            self.base_url, ticker, period1, period2
        )
    }
}

impl DataPort for YahooAdapter {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ScannerError> {
        let url = self.chart_url(ticker, start_date, end_date);
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send().map_err(|e| ScannerError::Data {
            reason: format!("{}: request failed: {}", ticker, e),
        })?;
        let status = response.status();
        let body = response.text().map_err(|e| ScannerError::Data {
            reason: format!("{}: failed to read response: {}", ticker, e),
        })?;

        // Unknown symbols come back as 404 with a chart.error body.
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(ScannerError::Data {
                reason: format!("{}: HTTP {}", ticker, status),
            });
        }

        parse_chart(ticker, &body, start_date, end_date)
    }
}

fn parse_chart(
    ticker: &str,
    body: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<OhlcvBar>, ScannerError> {
    let response: YahooResponse = serde_json::from_str(body).map_err(|e| ScannerError::Data {
        reason: format!("{}: invalid chart response: {}", ticker, e),
    })?;

    if let Some(error) = response.chart.error {
        if error.code == "Not Found" {
            return Ok(Vec::new());
        }
        return Err(ScannerError::Data {
            reason: format!("{}: {} - {}", ticker, error.code, error.description),
        });
    }

    let Some(data) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let timestamps = data.timestamp.unwrap_or_default();
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let Some(date) = DateTime::from_timestamp(ts + offset, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        if date < start_date || date > end_date {
            continue;
        }
        let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();
        if let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            field(&quote.open),
            field(&quote.high),
            field(&quote.low),
            field(&quote.close),
            field(&quote.volume),
        ) {
            bars.push(OhlcvBar {
                ticker: ticker.to_string(),
                date,
                open,
                high,
                low,
                close,
                volume: volume.round() as i64,
            });
        }
    }

    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);
    Ok(bars)
}
