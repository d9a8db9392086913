//! ADX (Average Directional Index) indicator.
//!
//! Wilder's construction over high/low/close:
//! - TR, +DM and -DM per bar from bar 1 onwards
//! - Wilder sums: S[n] = sum of first n values, S[i] = S[i-1] - S[i-1]/n + x[i]
//! - +DI = 100 * S(+DM) / S(TR), -DI = 100 * S(-DM) / S(TR)
//! - DX = 100 * |+DI - -DI| / (+DI + -DI)
//! - ADX seeded with the mean of the first n DX values, then Wilder-smoothed
//!
//! Warmup: first 2n-1 bars are invalid.

use crate::domain::indicator::{
    IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue, all_invalid,
};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_adx(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.len() < 2 * period {
        return all_invalid(bars, IndicatorType::Adx(period));
    }

    let n = period as f64;
    let mut dx: Vec<Option<f64>> = vec![None; bars.len()];

    let mut sum_tr = 0.0;
    let mut sum_plus = 0.0;
    let mut sum_minus = 0.0;

    for i in 1..bars.len() {
        let tr = bars[i].true_range(bars[i - 1].close);
        let (plus_dm, minus_dm) = bars[i].directional_movement(&bars[i - 1]);

        if i <= period {
            sum_tr += tr;
            sum_plus += plus_dm;
            sum_minus += minus_dm;
        } else {
            sum_tr = sum_tr - sum_tr / n + tr;
            sum_plus = sum_plus - sum_plus / n + plus_dm;
            sum_minus = sum_minus - sum_minus / n + minus_dm;
        }

        if i >= period {
            dx[i] = Some(directional_index(sum_tr, sum_plus, sum_minus));
        }
    }

    let first_valid = 2 * period - 1;
    let mut adx = 0.0;
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let valid = i >= first_valid;
        if i == first_valid {
            adx = dx[period..=first_valid].iter().flatten().sum::<f64>() / n;
        } else if i > first_valid {
            adx = (adx * (n - 1.0) + dx[i].unwrap_or(0.0)) / n;
        }
        values.push(IndicatorPoint {
            date: bar.date,
            valid,
            value: IndicatorValue::Simple(if valid { adx } else { 0.0 }),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Adx(period),
        values,
    }
}

fn directional_index(sum_tr: f64, sum_plus: f64, sum_minus: f64) -> f64 {
    if sum_tr == 0.0 {
        return 0.0;
    }
    let plus_di = 100.0 * sum_plus / sum_tr;
    let minus_di = 100.0 * sum_minus / sum_tr;
    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        0.0
    } else {
        100.0 * (plus_di - minus_di).abs() / di_sum
    }
}
