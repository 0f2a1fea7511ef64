//! Error types for the stex-core library.

use thiserror::Error;

use crate::session::SessionPhase;

/// Main error type for the stex library.
#[derive(Error, Debug)]
pub enum StexError {
    /// File intake rejection.
    #[error("intake error: {0}")]
    Intake(#[from] IntakeError),

    /// Extraction contract violation.
    #[error("contract error: {0}")]
    Contract(#[from] ContractError),

    /// Session lifecycle violation.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Export serialization error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised when a selected file is rejected or cannot be encoded.
#[derive(Error, Debug)]
pub enum IntakeError {
    /// The file's media type is neither an image type nor PDF.
    #[error("unsupported media type: {0} (expected image/* or application/pdf)")]
    UnsupportedMediaType(String),

    /// The file exceeds the inline-data size ceiling.
    #[error("file is too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    /// No media type could be derived from the file name.
    #[error("cannot determine media type for '{0}'")]
    UnknownExtension(String),

    /// The transport encoding could not be reversed.
    #[error("invalid transport encoding: {0}")]
    Encoding(#[from] base64::DecodeError),
}

/// Errors raised when the extraction response violates the contract.
#[derive(Error, Debug)]
pub enum ContractError {
    /// The response body is not syntactically valid structured data, or
    /// does not parse into a sequence of transaction objects.
    #[error("response does not match the extraction contract: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors raised by invalid session lifecycle transitions.
#[derive(Error, Debug)]
pub enum SessionError {
    /// An extraction is already in flight.
    #[error("extraction already in progress")]
    Busy,

    /// Processing was requested with no file selected.
    #[error("no file selected")]
    NoFile,

    /// The requested operation is not permitted in the current phase.
    #[error("operation not permitted in {0:?} phase")]
    Phase(SessionPhase),
}

/// Errors raised while serializing exports.
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The in-memory export buffer could not be finalized.
    #[error("export buffer error: {0}")]
    Buffer(String),

    /// The export buffer was not valid UTF-8.
    #[error("export buffer was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type for the stex library.
pub type Result<T> = std::result::Result<T, StexError>;
