//! Report generation port trait.

use crate::domain::error::ScannerError;
use crate::domain::scan::ScanResult;

/// Port for writing scan reports.
pub trait ReportPort {
    fn write(&self, result: &ScanResult, output_path: &str) -> Result<(), ScannerError>;
}
