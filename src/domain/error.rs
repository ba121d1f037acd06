//! Domain error types.

/// Top-level error type for cotboard.
#[derive(Debug, thiserror::Error)]
pub enum CotError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("remote data source unavailable: {reason}")]
    RemoteUnavailable { reason: String },

    #[error("malformed response from remote data source: {reason}")]
    MalformedResponse { reason: String },

    #[error("no report date returned for dataset {dataset}")]
    EmptyAggregate { dataset: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CotError {
    /// True for the failures that mean "no table could be produced this cycle".
    pub fn is_data_unavailable(&self) -> bool {
        matches!(
            self,
            CotError::RemoteUnavailable { .. }
                | CotError::MalformedResponse { .. }
                | CotError::EmptyAggregate { .. }
        )
    }

    pub fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        CotError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&CotError> for std::process::ExitCode {
    fn from(err: &CotError) -> Self {
        let code: u8 = match err {
            CotError::Io(_) => 1,
            CotError::ConfigParse { .. } | CotError::ConfigInvalid { .. } => 2,
            CotError::RemoteUnavailable { .. } | CotError::MalformedResponse { .. } => 3,
            CotError::EmptyAggregate { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
