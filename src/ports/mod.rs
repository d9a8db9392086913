//! Port traits at the I/O seams of the scanner.

pub mod config_port;
pub mod data_port;
pub mod fundamentals_port;
pub mod report_port;
