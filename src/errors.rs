use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

/// Error type for the fallible edges of the dashboard core: I/O, parsing, validation.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Query string error: {0}")]
    Query(#[from] serde_urlencoded::de::Error),
    #[error("Query string encoding error: {0}")]
    QueryEncode(#[from] serde_urlencoded::ser::Error),
    #[error("Invalid date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
