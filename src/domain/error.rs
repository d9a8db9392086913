//! Domain error types.

use crate::domain::index::UniverseError;

/// Top-level error type for momentum-scanner.
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("data source error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown index: {name}")]
    UnknownIndex { name: String },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient data for {ticker}: have {bars} bars, need {minimum}")]
    InsufficientData {
        ticker: String,
        bars: usize,
        minimum: usize,
    },

    #[error("{feature} feature is required for {action}")]
    FeatureDisabled { feature: String, action: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScannerError {
    pub fn feature_disabled(feature: &str, action: &str) -> Self {
        ScannerError::FeatureDisabled {
            feature: feature.to_string(),
            action: action.to_string(),
        }
    }
}

impl From<&ScannerError> for std::process::ExitCode {
    fn from(err: &ScannerError) -> Self {
        let code: u8 = match err {
            ScannerError::Io(_) | ScannerError::Report { .. } => 1,
            ScannerError::ConfigParse { .. }
            | ScannerError::ConfigMissing { .. }
            | ScannerError::ConfigInvalid { .. } => 2,
            ScannerError::Data { .. } => 3,
            ScannerError::UnknownIndex { .. } | ScannerError::Universe(_) => 4,
            ScannerError::NoData { .. } | ScannerError::InsufficientData { .. } => 5,
            ScannerError::FeatureDisabled { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    #[test]
    fn feature_disabled_message() {
        let err = ScannerError::feature_disabled("yahoo", "source = yahoo");
        assert_eq!(err.to_string(), "yahoo feature is required for source = yahoo");
    }

    #[test]
    fn universe_error_is_transparent() {
        let err = ScannerError::from(UniverseError::DuplicateTicker("TCS.NS".into()));
        assert_eq!(err.to_string(), "duplicate ticker: TCS.NS");
    }

    #[test]
    fn exit_codes_by_kind() {
        let cases = [
            (ScannerError::Data { reason: "x".into() }, ExitCode::from(3)),
            (
                ScannerError::UnknownIndex { name: "x".into() },
                ExitCode::from(4),
            ),
            (ScannerError::NoData { ticker: "x".into() }, ExitCode::from(5)),
            (
                ScannerError::feature_disabled("web", "serve"),
                ExitCode::from(6),
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(
                format!("{:?}", ExitCode::from(&err)),
                format!("{:?}", expected),
                "{err}"
            );
        }
    }
}
