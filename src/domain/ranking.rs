//! Momentum score and ticker ranking.
//!
//! Momentum_Score = RSI + MACD + (SMA_10 - SMA_50) + ADX + RVOL
//!
//! Unit weights, no normalisation. A row without every component has no score.

use crate::domain::ticker_data::{IndicatorRow, TickerData};
use chrono::NaiveDate;

pub const DEFAULT_TOP_N: usize = 5;

/// The summands of a momentum score, kept for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreComponents {
    pub rsi: f64,
    pub macd: f64,
    pub sma_spread: f64,
    pub adx: f64,
    pub rvol: f64,
}

impl ScoreComponents {
    pub fn from_row(row: &IndicatorRow) -> Option<Self> {
        Some(Self {
            rsi: row.rsi?,
            macd: row.macd?,
            sma_spread: row.sma_10? - row.sma_50?,
            adx: row.adx?,
            rvol: row.rvol?,
        })
    }

    pub fn total(&self) -> f64 {
        self.rsi + self.macd + self.sma_spread + self.adx + self.rvol
    }
}

pub fn momentum_score(row: &IndicatorRow) -> Option<f64> {
    ScoreComponents::from_row(row).map(|c| c.total())
}

/// Momentum score for every bar of the table, `None` during warm-up.
pub fn score_series(td: &TickerData) -> Vec<(NaiveDate, Option<f64>)> {
    (0..td.bar_count())
        .filter_map(|i| td.row(i))
        .map(|row| (row.date, momentum_score(&row)))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedTicker {
    pub rank: usize,
    pub ticker: String,
    pub date: NaiveDate,
    pub close: f64,
    pub score: f64,
    pub components: ScoreComponents,
}

#[derive(Debug, Clone, Default)]
pub struct Ranking {
    pub top: Vec<RankedTicker>,
    /// Tickers whose latest row lacks a component.
    pub unscored: Vec<String>,
}

/// Scores each ticker on its latest bar and keeps the `top_n` largest.
///
/// Sorted by descending score; equal scores keep input order.
pub fn rank_tickers(tickers: &[TickerData], top_n: usize) -> Ranking {
    let mut scored = Vec::with_capacity(tickers.len());
    let mut unscored = Vec::new();

    for td in tickers {
        let latest = td.latest_row();
        let components = latest.as_ref().and_then(ScoreComponents::from_row);
        match (latest, components, td.ohlcv.last()) {
            (Some(row), Some(components), Some(bar)) => scored.push(RankedTicker {
                rank: 0,
                ticker: td.ticker.clone(),
                date: row.date,
                close: bar.close,
                score: components.total(),
                components,
            }),
            _ => {
                log::warn!("{}: not enough history to score", td.ticker);
                unscored.push(td.ticker.clone());
            }
        }
    }

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_n);
    for (i, r) in scored.iter_mut().enumerate() {
        r.rank = i + 1;
    }

    Ranking {
        top: scored,
        unscored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;
    use chrono::Duration;

    fn row(rsi: f64, macd: f64, sma_10: f64, sma_50: f64, adx: f64, rvol: f64) -> IndicatorRow {
        IndicatorRow {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            rsi: Some(rsi),
            macd: Some(macd),
            sma_10: Some(sma_10),
            sma_50: Some(sma_50),
            adx: Some(adx),
            rvol: Some(rvol),
        }
    }

    fn generate(ticker: &str, count: usize, step: f64) -> TickerData {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..count)
            .map(|i| {
                let close = 100.0 + step * i as f64 + if i % 3 == 0 { -0.5 } else { 0.5 };
                OhlcvBar {
                    ticker: ticker.into(),
                    date: start + Duration::days(i as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1000 + (i as i64 % 7) * 50,
                }
            })
            .collect();
        TickerData::with_momentum_indicators(ticker.into(), bars)
    }

    #[test]
    fn score_is_literal_sum() {
        let r = row(60.0, 1.5, 105.0, 100.0, 25.0, 1.2);
        assert_eq!(momentum_score(&r), Some(60.0 + 1.5 + 5.0 + 25.0 + 1.2));
    }

    #[test]
    fn missing_component_has_no_score() {
        let mut r = row(60.0, 1.5, 105.0, 100.0, 25.0, 1.2);
        r.sma_50 = None;
        assert_eq!(momentum_score(&r), None);
    }

    #[test]
    fn score_series_warms_up() {
        let td = generate("A.NS", 70, 0.5);
        let series = score_series(&td);
        assert_eq!(series.len(), 70);
        assert!(series[0].1.is_none());
        assert!(series[69].1.is_some());
    }

    #[test]
    fn rank_orders_descending_and_truncates() {
        let tickers = vec![
            generate("FLAT.NS", 80, 0.0),
            generate("UP.NS", 80, 1.0),
            generate("DOWN.NS", 80, -0.5),
        ];

        let ranking = rank_tickers(&tickers, 2);

        assert_eq!(ranking.top.len(), 2);
        assert_eq!(ranking.top[0].ticker, "UP.NS");
        assert_eq!(ranking.top[0].rank, 1);
        assert_eq!(ranking.top[1].rank, 2);
        assert!(ranking.top[0].score >= ranking.top[1].score);
        assert!(ranking.unscored.is_empty());
    }

    #[test]
    fn rank_reports_short_histories() {
        let tickers = vec![generate("NEW.NS", 20, 1.0), generate("OLD.NS", 80, 1.0)];
        let ranking = rank_tickers(&tickers, DEFAULT_TOP_N);

        assert_eq!(ranking.top.len(), 1);
        assert_eq!(ranking.top[0].ticker, "OLD.NS");
        assert_eq!(ranking.unscored, vec!["NEW.NS".to_string()]);
    }

    #[test]
    fn rank_ties_keep_input_order() {
        let tickers = vec![generate("FIRST.NS", 80, 1.0), generate("SECOND.NS", 80, 1.0)];
        let ranking = rank_tickers(&tickers, DEFAULT_TOP_N);
        assert_eq!(ranking.top[0].ticker, "FIRST.NS");
        assert_eq!(ranking.top[1].ticker, "SECOND.NS");
    }

    #[test]
    fn ranked_score_matches_components() {
        let ranking = rank_tickers(&[generate("A.NS", 80, 0.7)], 1);
        let top = &ranking.top[0];
        assert!((top.score - top.components.total()).abs() < f64::EPSILON);
    }
}
