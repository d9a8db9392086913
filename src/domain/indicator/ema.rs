//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{
    IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue, all_invalid,
};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return all_invalid(bars, IndicatorType::Ema(period));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let values = bars
        .iter()
        .zip(ema_values(&closes, period))
        .map(|(bar, ema)| IndicatorPoint {
            date: bar.date,
            valid: ema.is_some(),
            value: IndicatorValue::Simple(ema.unwrap_or(0.0)),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}

/// SMA-seeded EMA over an arbitrary sequence; `None` during warm-up.
pub(crate) fn ema_values(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if period == 0 {
        out.resize(values.len(), None);
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, &v) in values.iter().enumerate() {
        if i < period - 1 {
            sum += v;
            out.push(None);
        } else if i == period - 1 {
            sum += v;
            ema = sum / period as f64;
            out.push(Some(ema));
        } else {
            ema = v * k + ema * (1.0 - k);
            out.push(Some(ema));
        }
    }
    out
}
