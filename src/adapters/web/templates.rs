//! HTML templates using Askama.

use askama::Template;

use crate::adapters::report_view::ReportView;
use crate::domain::index::{INDICES, MarketIndex};

pub struct IndexOption {
    pub name: &'static str,
    pub slug: String,
    pub selected: bool,
}

pub fn index_options(selected: &MarketIndex) -> Vec<IndexOption> {
    INDICES
        .iter()
        .map(|idx| IndexOption {
            name: idx.name,
            slug: idx.slug(),
            selected: idx == selected,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub indices: Vec<IndexOption>,
    pub roe: String,
    pub de: String,
    pub view: Option<ReportView>,
    pub error: Option<String>,
}

/// The `#results` fragment swapped in by HTMX.
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate {
    pub view: ReportView,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}

#[derive(Template)]
#[template(path = "error_fragment.html")]
pub struct ErrorFragmentTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}
