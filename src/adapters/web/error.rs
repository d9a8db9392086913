//! HTTP error responses for web adapter.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::domain::error::ScannerError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
    /// Render only the error fragment (HTMX swap target).
    pub fragment: bool,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fragment: false,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn as_fragment(mut self, fragment: bool) -> Self {
        self.fragment = fragment;
        self
    }
}

pub fn status_from_error(err: &ScannerError) -> StatusCode {
    match err {
        ScannerError::ConfigMissing { .. }
        | ScannerError::ConfigInvalid { .. }
        | ScannerError::ConfigParse { .. }
        | ScannerError::UnknownIndex { .. }
        | ScannerError::Universe(_) => StatusCode::BAD_REQUEST,
        ScannerError::NoData { .. } | ScannerError::InsufficientData { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ScannerError::Data { .. } => StatusCode::BAD_GATEWAY,
        ScannerError::FeatureDisabled { .. }
        | ScannerError::Report { .. }
        | ScannerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ScannerError> for WebError {
    fn from(err: ScannerError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status.as_u16();
        let rendered = if self.fragment {
            super::templates::ErrorFragmentTemplate {
                message: &self.message,
                status,
            }
            .render()
        } else {
            super::templates::ErrorTemplate {
                message: &self.message,
                status,
            }
            .render()
        };
        match rendered {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}
