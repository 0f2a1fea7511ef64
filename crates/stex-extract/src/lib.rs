//! Extraction client layer for stex.
//!
//! This crate provides a unified seam for obtaining transaction rows from
//! an encoded document:
//! - `GeminiExtractor` calls the hosted multimodal completion service with
//!   the document inlined, the extraction instruction block and the
//!   structured-output constraint
//! - `MockExtractor` returns canned rows for tests and offline runs
//!
//! The hosted model is the only place the hard semantic work happens
//! (multi-line merging, column disambiguation); swapping in a local or
//! deterministic extractor only requires another `DocumentExtractor` impl.

mod error;
mod extractor;
mod gemini;

pub use error::{ExtractError, GENERIC_FAILURE};
pub use extractor::{DocumentExtractor, MockExtractor};
pub use gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, GeminiExtractor};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
