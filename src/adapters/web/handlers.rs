//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::adapters::report_view::ReportView;
use crate::domain::index::{DEFAULT_INDEX, find_index};
use crate::domain::scan::{ScanConfig, ScanOverrides, run_scan};

use super::templates::{DashboardTemplate, ResultsTemplate, index_options};
use super::{AppState, WebError, is_htmx_request};

#[derive(Debug, Default, serde::Deserialize)]
pub struct ScanQuery {
    pub index: Option<String>,
    pub roe: Option<String>,
    pub de: Option<String>,
}

fn parse_threshold(label: &str, raw: Option<&str>) -> Result<Option<f64>, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| format!("Invalid {}: '{}'", label, s)),
    }
}

/// Threshold inputs exactly as submitted, echoed back on an error page.
#[derive(Debug, Default)]
struct SubmittedForm {
    roe: String,
    de: String,
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    render_scan(
        state,
        is_htmx_request(&headers),
        ScanOverrides::default(),
        SubmittedForm::default(),
        None,
    )
    .await
}

pub async fn scan(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ScanQuery>,
) -> Result<Response, WebError> {
    let htmx = is_htmx_request(&headers);
    let mut overrides = ScanOverrides {
        index: query.index.clone().filter(|s| !s.trim().is_empty()),
        ..Default::default()
    };

    let submitted = SubmittedForm {
        roe: query.roe.clone().unwrap_or_default(),
        de: query.de.clone().unwrap_or_default(),
    };

    let parsed = parse_threshold("ROE threshold", query.roe.as_deref()).and_then(|roe| {
        parse_threshold("Debt-to-Equity threshold", query.de.as_deref()).map(|de| (roe, de))
    });
    match parsed {
        Ok((roe, de)) => {
            overrides.roe_threshold = roe;
            overrides.debt_to_equity_threshold = de;
            render_scan(state, htmx, overrides, submitted, None).await
        }
        Err(message) => {
            render_scan(
                state,
                htmx,
                overrides,
                submitted,
                Some(WebError::bad_request(message)),
            )
            .await
        }
    }
}

/// Runs the scan for the form values and renders either the whole page or
/// the `#results` fragment. `early` carries a form error found before the
/// scan could start; `submitted` refills the inputs when the scan fails.
async fn render_scan(
    state: Arc<AppState>,
    htmx: bool,
    overrides: ScanOverrides,
    submitted: SubmittedForm,
    early: Option<WebError>,
) -> Result<Response, WebError> {
    let today = chrono::Local::now().date_naive();

    let outcome = match early {
        Some(err) => Err(err),
        None => match ScanConfig::from_config(&*state.config, &overrides, today) {
            Err(e) => Err(WebError::from(e)),
            Ok(config) => {
                log::info!(
                    "web scan: {} roe>{} de<{}",
                    config.index.name,
                    config.filter.roe_threshold,
                    config.filter.debt_to_equity_threshold
                );
                let worker = Arc::clone(&state);
                let cfg = config.clone();
                match tokio::task::spawn_blocking(move || {
                    run_scan(&*worker.data_port, &*worker.fundamentals_port, &cfg)
                })
                .await
                {
                    Err(e) => Err(WebError::internal(format!("scan task failed: {}", e))),
                    Ok(result) => result
                        .map(|r| (config, ReportView::from_result(&r)))
                        .map_err(WebError::from),
                }
            }
        },
    };

    if htmx {
        return match outcome {
            Ok((_, view)) => ResultsTemplate { view }
                .render()
                .map(|html| Html(html).into_response())
                .map_err(|e| WebError::internal(e.to_string()).as_fragment(true)),
            Err(err) => Err(err.as_fragment(true)),
        };
    }

    let (status, page) = match outcome {
        Ok((config, view)) => (
            StatusCode::OK,
            DashboardTemplate {
                indices: index_options(&config.index),
                roe: config.filter.roe_threshold.to_string(),
                de: config.filter.debt_to_equity_threshold.to_string(),
                view: Some(view),
                error: None,
            },
        ),
        Err(err) => {
            let mut message = err.message;
            let selected = match overrides.index.as_deref() {
                None => DEFAULT_INDEX,
                Some(name) => find_index(name).unwrap_or_else(|_| {
                    message = format!(
                        "{} (index selection reset to {})",
                        message, DEFAULT_INDEX.name
                    );
                    DEFAULT_INDEX
                }),
            };
            log::warn!("web scan failed: {}", message);
            (
                err.status,
                DashboardTemplate {
                    indices: index_options(&selected),
                    roe: submitted.roe,
                    de: submitted.de,
                    view: None,
                    error: Some(message),
                },
            )
        }
    };

    page.render()
        .map(|html| (status, Html(html)).into_response())
        .map_err(|e| WebError::internal(e.to_string()))
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}
