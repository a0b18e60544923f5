//! Generic document-level error type shared by the `common` and `ooxml` layers.
//!
//! This is distinct from `crate::error::PipelineError`, which carries the
//! stage-level taxonomy (`EXTRACTION_ERROR`, `INVALID_PLAN`, ...) the
//! orchestrator reports to callers. `Error` here is the lower-level error
//! surfaced by unit conversion, color parsing, XML escaping and OOXML
//! package access.
use thiserror::Error;

/// Generic error type for document-level operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error occurred
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Corrupted or malformed file
    #[error("Corrupted file: {0}")]
    CorruptedFile(String),

    /// Stream or part not found
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// Invalid content type
    #[error("Invalid content type: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for document-level operations.
pub type Result<T> = std::result::Result<T, Error>;
