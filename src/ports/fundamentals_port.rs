//! Fundamentals access port trait.

use crate::domain::error::ScannerError;
use crate::domain::fundamentals::Fundamentals;

pub trait FundamentalsPort {
    /// `Ok(None)` when the source has no entry for `ticker`.
    fn fetch_fundamentals(&self, ticker: &str) -> Result<Option<Fundamentals>, ScannerError>;
}
