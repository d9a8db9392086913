//! Web dashboard adapter.
//!
//! Axum server with an HTMX-driven form: changing the index or a threshold
//! re-runs the scan and swaps in the new results.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::fundamentals_port::FundamentalsPort;

pub struct AppState {
    pub data_port: Arc<dyn DataPort + Send + Sync>,
    pub fundamentals_port: Arc<dyn FundamentalsPort + Send + Sync>,
    pub config: Arc<dyn ConfigPort + Send + Sync>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/scan", get(handlers::scan))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
