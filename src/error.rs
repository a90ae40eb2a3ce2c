//! Error types for QCert

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// QCert errors
#[derive(Error, Debug)]
pub enum Error {
    /// An operator key the query grammar does not define. Never treated as
    /// "unconstrained": a silently ignored operator could certify a query
    /// as complete when the database holds only part of its results.
    #[error("Unknown query operator: {0}")]
    UnknownOperator(String),

    #[error("Malformed query: {0}")]
    BadQuery(String),

    #[error("Non-numeric value where a number set is required: {0}")]
    NonNumeric(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
