use thiserror::Error;

/// Shared error taxonomy for the CodeMasti site.
///
/// The variants map directly onto HTTP status classes at the API layer:
/// validation failures are client errors (400), conflicts are 409, upstream
/// provider failures and missing configuration both surface as 500.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or missing input. Never retried.
    #[error("{0}")]
    Validation(String),

    /// Duplicate registration email. Never retried.
    #[error("{0}")]
    Conflict(String),

    /// Email, spreadsheet or payment-gateway provider failure.
    #[error("{0}")]
    Upstream(String),

    /// A required environment secret is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
