//! Concrete adapter implementations for ports.

pub mod chart_svg;
pub mod console_report;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod html_report_adapter;
pub mod report_view;
#[cfg(feature = "web")]
pub mod web;
#[cfg(feature = "yahoo")]
pub mod yahoo_adapter;
