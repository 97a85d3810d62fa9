use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    /// Input file does not exist.
    #[error("source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// Input exists but is not readable as UTF-8 delimited text with a header row.
    #[error("cannot parse {}: {message}", path.display())]
    SourceFormat { path: PathBuf, message: String },

    /// Report could not be rendered.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config validation error (bad sample size, empty generic name, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
