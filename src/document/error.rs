//! Document error types
//!
//! Unified error handling for the load pipeline. Everything here is caught
//! at the `process_file` boundary; nothing propagates past it to the UI.

use thiserror::Error;

/// Unified document error type
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File is neither PDF nor Word by MIME type or extension
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// External converter failed to parse the document
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// Presentation surface failed to render a page
    #[error("Render error: {0}")]
    Render(String),

    /// Converter was asked for a page outside the document
    #[error("Page not found: {0}")]
    PageNotFound(u32),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;
