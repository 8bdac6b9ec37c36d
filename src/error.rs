//! Error types for retail_price_fetch

use thiserror::Error;

/// Why a single source produced no candidate.
///
/// These never abort a run: sources log them and report "no candidate".
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// No price pattern matched in the response
    #[error("No price found in response")]
    NoMatch,
    /// Prices were found but none passed validation
    #[error("{0} candidate price(s) rejected by validation")]
    Rejected(usize),
    /// Estimation needs a buyback price
    #[error("No buyback price to estimate from")]
    NoReference,
}

/// Run-level errors. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum Error {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse a JSON file
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Invalid run configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias for run-level operations
pub type Result<T> = std::result::Result<T, Error>;
