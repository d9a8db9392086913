//! Fundamental quality filter.
//!
//! A ticker survives when `roe > roe_threshold` and
//! `debt_to_equity < debt_to_equity_threshold`. Both comparisons are strict,
//! and a ticker without fundamentals never survives.

use crate::domain::fundamentals::Fundamentals;
use crate::domain::ticker_data::TickerData;
use std::fmt;

pub const DEFAULT_ROE_THRESHOLD: f64 = 10.0;
pub const DEFAULT_DEBT_TO_EQUITY_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityFilter {
    pub roe_threshold: f64,
    pub debt_to_equity_threshold: f64,
}

impl Default for QualityFilter {
    fn default() -> Self {
        Self {
            roe_threshold: DEFAULT_ROE_THRESHOLD,
            debt_to_equity_threshold: DEFAULT_DEBT_TO_EQUITY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExclusionReason {
    MissingFundamentals,
    RoeTooLow { roe: f64 },
    DebtTooHigh { debt_to_equity: f64 },
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::MissingFundamentals => write!(f, "no fundamentals"),
            ExclusionReason::RoeTooLow { roe } => write!(f, "ROE {:.2} at or below threshold", roe),
            ExclusionReason::DebtTooHigh { debt_to_equity } => {
                write!(f, "Debt/Equity {:.2} at or above threshold", debt_to_equity)
            }
        }
    }
}

impl QualityFilter {
    pub fn new(roe_threshold: f64, debt_to_equity_threshold: f64) -> Self {
        Self {
            roe_threshold,
            debt_to_equity_threshold,
        }
    }

    /// `None` when the fundamentals pass, otherwise the first failed check.
    pub fn check(&self, fundamentals: Option<&Fundamentals>) -> Option<ExclusionReason> {
        let Some(f) = fundamentals else {
            return Some(ExclusionReason::MissingFundamentals);
        };
        // Written as negated passes so NaN fails both checks.
        if !(f.roe > self.roe_threshold) {
            return Some(ExclusionReason::RoeTooLow { roe: f.roe });
        }
        if !(f.debt_to_equity < self.debt_to_equity_threshold) {
            return Some(ExclusionReason::DebtTooHigh {
                debt_to_equity: f.debt_to_equity,
            });
        }
        None
    }

    pub fn passes(&self, fundamentals: Option<&Fundamentals>) -> bool {
        self.check(fundamentals).is_none()
    }
}

#[derive(Debug, Clone)]
pub struct ExcludedTicker {
    pub ticker: String,
    pub reason: ExclusionReason,
}

#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub kept: Vec<TickerData>,
    pub excluded: Vec<ExcludedTicker>,
}

/// Splits tickers into survivors (input order preserved) and exclusions.
pub fn apply_quality_filters(tickers: Vec<TickerData>, filter: &QualityFilter) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    for td in tickers {
        match filter.check(td.fundamentals.as_ref()) {
            None => outcome.kept.push(td),
            Some(reason) => {
                log::info!("  {}: filtered out ({})", td.ticker, reason);
                outcome.excluded.push(ExcludedTicker {
                    ticker: td.ticker,
                    reason,
                });
            }
        }
    }
    outcome
}
