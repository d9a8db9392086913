//! Indicator dispatch and the scanner's fixed indicator columns.

use crate::domain::indicator::{
    IndicatorSeries, IndicatorType, adx, calculate_adx, calculate_ema, calculate_macd,
    calculate_rsi, calculate_rvol, calculate_sma, macd, rsi, rvol,
};
use crate::domain::ohlcv::OhlcvBar;
use std::collections::HashMap;

pub const SMA_SHORT: usize = 10;
pub const SMA_LONG: usize = 50;

/// The derived columns of the momentum table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Rsi,
    Macd,
    Sma10,
    Sma50,
    Adx,
    Rvol,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Rsi,
        Column::Macd,
        Column::Sma10,
        Column::Sma50,
        Column::Adx,
        Column::Rvol,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Rsi => "RSI",
            Column::Macd => "MACD",
            Column::Sma10 => "SMA_10",
            Column::Sma50 => "SMA_50",
            Column::Adx => "ADX",
            Column::Rvol => "RVOL",
        }
    }

    pub fn indicator_type(self) -> IndicatorType {
        match self {
            Column::Rsi => IndicatorType::Rsi(rsi::DEFAULT_PERIOD),
            Column::Macd => IndicatorType::Macd {
                fast: macd::DEFAULT_FAST,
                slow: macd::DEFAULT_SLOW,
                signal: macd::DEFAULT_SIGNAL,
            },
            Column::Sma10 => IndicatorType::Sma(SMA_SHORT),
            Column::Sma50 => IndicatorType::Sma(SMA_LONG),
            Column::Adx => IndicatorType::Adx(adx::DEFAULT_PERIOD),
            Column::Rvol => IndicatorType::Rvol(rvol::DEFAULT_PERIOD),
        }
    }
}

/// Indicator identities for every momentum column.
pub fn momentum_indicators() -> Vec<IndicatorType> {
    Column::ALL.iter().map(|c| c.indicator_type()).collect()
}

pub fn calculate(bars: &[OhlcvBar], indicator_type: IndicatorType) -> IndicatorSeries {
    match indicator_type {
        IndicatorType::Sma(period) => calculate_sma(bars, period),
        IndicatorType::Ema(period) => calculate_ema(bars, period),
        IndicatorType::Rsi(period) => calculate_rsi(bars, period),
        IndicatorType::Adx(period) => calculate_adx(bars, period),
        IndicatorType::Rvol(period) => calculate_rvol(bars, period),
        IndicatorType::Macd { fast, slow, signal } => calculate_macd(bars, fast, slow, signal),
    }
}

/// Computes each requested indicator once; duplicates are ignored.
pub fn compute_indicators(
    bars: &[OhlcvBar],
    types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut out = HashMap::with_capacity(types.len());
    for &indicator_type in types {
        out.entry(indicator_type).or_insert_with(|| {
            let series = calculate(bars, indicator_type);
            log::debug!(
                "computed {} over {} bars ({} valid)",
                indicator_type,
                bars.len(),
                series.valid_count()
            );
            series
        });
    }
    out
}
