//! Core domain types and pipeline stages.

pub mod ohlcv;
pub mod indicator;
pub mod indicator_helpers;
pub mod ticker_data;
pub mod fundamentals;
pub mod filter;
pub mod ranking;
pub mod index;
pub mod scan;
pub mod config_validation;
pub mod error;
