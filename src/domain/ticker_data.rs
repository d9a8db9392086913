//! One ticker's table: bars, derived indicator columns and fundamentals.

use crate::domain::fundamentals::Fundamentals;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{Column, compute_indicators, momentum_indicators};
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TickerData {
    pub ticker: String,
    pub ohlcv: Vec<OhlcvBar>,
    pub indicators: HashMap<IndicatorType, IndicatorSeries>,
    pub date_index: HashMap<NaiveDate, usize>,
    pub fundamentals: Option<Fundamentals>,
}

/// The derived columns of a single trade date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub sma_10: Option<f64>,
    pub sma_50: Option<f64>,
    pub adx: Option<f64>,
    pub rvol: Option<f64>,
}

impl IndicatorRow {
    pub fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::Rsi => self.rsi,
            Column::Macd => self.macd,
            Column::Sma10 => self.sma_10,
            Column::Sma50 => self.sma_50,
            Column::Adx => self.adx,
            Column::Rvol => self.rvol,
        }
    }
}

impl TickerData {
    pub fn new(ticker: String, mut ohlcv: Vec<OhlcvBar>) -> Self {
        ohlcv.sort_by_key(|b| b.date);
        let date_index = ohlcv
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.date, i))
            .collect();
        Self {
            ticker,
            ohlcv,
            indicators: HashMap::new(),
            date_index,
            fundamentals: None,
        }
    }

    /// Builds the table and fills every momentum column from scratch.
    pub fn with_momentum_indicators(ticker: String, ohlcv: Vec<OhlcvBar>) -> Self {
        let mut td = Self::new(ticker, ohlcv);
        td.recompute_indicators();
        td
    }

    /// Discards any previous derived columns and recomputes them.
    pub fn recompute_indicators(&mut self) {
        self.indicators = compute_indicators(&self.ohlcv, &momentum_indicators());
    }

    pub fn bar_count(&self) -> usize {
        self.ohlcv.len()
    }

    pub fn get_bar(&self, date: NaiveDate) -> Option<&OhlcvBar> {
        self.date_index.get(&date).map(|&i| &self.ohlcv[i])
    }

    pub fn get_bar_index(&self, date: NaiveDate) -> Option<usize> {
        self.date_index.get(&date).copied()
    }

    pub fn value(&self, column: Column, index: usize) -> Option<f64> {
        self.indicators
            .get(&column.indicator_type())
            .and_then(|s| s.value_at(index))
    }

    pub fn row(&self, index: usize) -> Option<IndicatorRow> {
        let bar = self.ohlcv.get(index)?;
        Some(IndicatorRow {
            date: bar.date,
            rsi: self.value(Column::Rsi, index),
            macd: self.value(Column::Macd, index),
            sma_10: self.value(Column::Sma10, index),
            sma_50: self.value(Column::Sma50, index),
            adx: self.value(Column::Adx, index),
            rvol: self.value(Column::Rvol, index),
        })
    }

    pub fn latest_row(&self) -> Option<IndicatorRow> {
        self.ohlcv.len().checked_sub(1).and_then(|i| self.row(i))
    }

    /// Index of the first bar of the last `n` bars.
    pub fn tail_start(&self, n: usize) -> usize {
        self.ohlcv.len().saturating_sub(n)
    }

    pub fn tail(&self, n: usize) -> &[OhlcvBar] {
        &self.ohlcv[self.tail_start(n)..]
    }

    pub fn tail_rows(&self, n: usize) -> Vec<IndicatorRow> {
        (self.tail_start(n)..self.ohlcv.len())
            .filter_map(|i| self.row(i))
            .collect()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.ohlcv.first()?.date, self.ohlcv.last()?.date))
    }
}
