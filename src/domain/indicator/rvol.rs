//! Relative volume: today's volume over the trailing mean volume.
//!
//! RVOL[i] = V[i] / mean(V[i-n+1..=i]). The window includes the current bar.
//! Warmup: first (n-1) bars are invalid; a zero mean volume is also invalid.

use crate::domain::indicator::sma::rolling_mean;
use crate::domain::indicator::{
    IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue, all_invalid,
};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 20;

pub fn calculate_rvol(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return all_invalid(bars, IndicatorType::Rvol(period));
    }

    let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();
    let means = rolling_mean(&volumes, period);

    let values = bars
        .iter()
        .zip(means)
        .map(|(bar, mean)| {
            let rvol = mean
                .filter(|m| *m > 0.0)
                .map(|m| bar.volume as f64 / m);
            IndicatorPoint {
                date: bar.date,
                valid: rvol.is_some(),
                value: IndicatorValue::Simple(rvol.unwrap_or(0.0)),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Rvol(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn make_bars(volumes: &[i64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        volumes
            .iter()
            .enumerate()
            .map(|(i, &volume)| OhlcvBar {
                ticker: "TEST".into(),
                date: start + Duration::days(i as i64),
                open: 100.0,
                high: 100.0,
                low: 100.0,
                close: 100.0,
                volume,
            })
            .collect()
    }

    #[test]
    fn rvol_constant_volume_is_one() {
        let series = calculate_rvol(&make_bars(&[500; 25]), DEFAULT_PERIOD);
        assert_eq!(series.valid_count(), 6);
        assert_eq!(series.value_at(24), Some(1.0));
    }

    #[test]
    fn rvol_spike() {
        let series = calculate_rvol(&make_bars(&[100, 100, 100, 400]), 4);
        // mean = 700 / 4 = 175
        let v = series.value_at(3).unwrap();
        assert!((v - 400.0 / 175.0).abs() < 1e-12);
    }

    #[test]
    fn rvol_warmup() {
        let series = calculate_rvol(&make_bars(&[100, 200, 300]), 3);
        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
    }

    #[test]
    fn rvol_zero_mean_is_invalid() {
        let series = calculate_rvol(&make_bars(&[0, 0, 0]), 2);
        assert_eq!(series.valid_count(), 0);
    }

    #[test]
    fn rvol_indicator_type() {
        let series = calculate_rvol(&make_bars(&[1]), 20);
        assert_eq!(series.indicator_type, IndicatorType::Rvol(20));
    }
}
