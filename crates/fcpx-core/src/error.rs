//! Error types shared across the FCPX Studio crates.

use thiserror::Error;

/// Main error type for FCPX Studio operations.
#[derive(Error, Debug)]
pub enum FcpxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Time error: {0}")]
    Time(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Timeline error: {0}")]
    Timeline(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for FCPX Studio operations.
pub type Result<T> = std::result::Result<T, FcpxError>;
