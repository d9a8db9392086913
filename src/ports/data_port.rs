//! Price data access port trait.

use crate::domain::error::ScannerError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `ticker` within `[start_date, end_date]`, ascending by date.
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, ScannerError>;

    /// First date, last date and bar count, or `None` when the ticker has no data.
    fn get_data_range(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ScannerError> {
        let bars = self.fetch_ohlcv(ticker, start_date, end_date)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
