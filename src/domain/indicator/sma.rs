//! Simple Moving Average over closing prices.
//!
//! SMA[i] = mean(C[i-n+1..=i]). Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{
    IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue, all_invalid,
};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return all_invalid(bars, IndicatorType::Sma(period));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let averages = rolling_mean(&closes, period);

    let values = bars
        .iter()
        .zip(averages)
        .map(|(bar, avg)| IndicatorPoint {
            date: bar.date,
            valid: avg.is_some(),
            value: IndicatorValue::Simple(avg.unwrap_or(0.0)),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}

/// Trailing mean over `period` values; `None` until the window is full.
pub(crate) fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if period == 0 {
        out.resize(values.len(), None);
        return out;
    }

    let mut sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= period {
            sum -= values[i - period];
        }
        if i + 1 >= period {
            out.push(Some(sum / period as f64));
        } else {
            out.push(None);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                ticker: "TEST".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn sma_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_sma(&bars, 3);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[3].valid);
    }

    #[test]
    fn sma_values() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_sma(&bars, 3);

        assert_eq!(series.value_at(2), Some(20.0));
        assert_eq!(series.value_at(3), Some(30.0));
    }

    #[test]
    fn sma_period_1_is_close() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_sma(&bars, 1);
        assert_eq!(series.value_at(0), Some(10.0));
        assert_eq!(series.value_at(1), Some(20.0));
    }

    #[test]
    fn sma_shorter_than_period() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_sma(&bars, 5);
        assert_eq!(series.values.len(), 2);
        assert_eq!(series.valid_count(), 0);
    }

    #[test]
    fn sma_zero_period() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_sma(&bars, 0);
        assert_eq!(series.values.len(), 2);
        assert_eq!(series.valid_count(), 0);
    }

    #[test]
    fn sma_indicator_type() {
        let series = calculate_sma(&make_bars(&[1.0]), 50);
        assert_eq!(series.indicator_type, IndicatorType::Sma(50));
    }

    #[test]
    fn rolling_mean_drops_old_values() {
        let means = rolling_mean(&[1.0, 2.0, 3.0, 10.0], 2);
        assert_eq!(means, vec![None, Some(1.5), Some(2.5), Some(6.5)]);
    }
}
