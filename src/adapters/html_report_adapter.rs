//! HTML report adapter implementing ReportPort.
//!
//! Generates a standalone HTML page using Askama templates with inline SVG
//! charts.

use std::fs;
use std::path::Path;

use crate::adapters::report_view::ReportView;
use crate::domain::error::ScannerError;
use crate::domain::scan::ScanResult;
use crate::ports::report_port::ReportPort;

use askama::Template;

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate {
    view: ReportView,
}

pub fn render_report(result: &ScanResult) -> Result<String, ScannerError> {
    let template = ReportTemplate {
        view: ReportView::from_result(result),
    };
    template.render().map_err(|e| ScannerError::Report {
        reason: e.to_string(),
    })
}

pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, result: &ScanResult, output_path: &str) -> Result<(), ScannerError> {
        let html = render_report(result)?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;
        log::info!("Report written to: {}", path.display());

        Ok(())
    }
}
