//! Core library for bank-statement transaction extraction.
//!
//! This crate provides:
//! - File intake (media type and size validation, transport encoding)
//! - The extraction contract (instruction block, structured-output schema,
//!   response decoding into typed transaction rows)
//! - Table rendering with fixed column order and currency formatting
//! - Export serialization (JSON, spreadsheet TSV, RFC4180 CSV)
//! - The session lifecycle state machine (idle/processing/success/error)
//!
//! The extraction intelligence itself lives behind the `DocumentExtractor`
//! capability in the `stex-extract` crate; this crate only defines what a
//! well-formed result looks like and what happens to it afterwards.

pub mod contract;
pub mod error;
pub mod export;
pub mod intake;
pub mod models;
pub mod session;
pub mod table;

pub use contract::{EXTRACTION_PROMPT, decode_transactions, response_schema};
pub use error::{ContractError, ExportError, IntakeError, Result, SessionError, StexError};
pub use intake::{EncodedDocument, MAX_FILE_BYTES, UploadedFile};
pub use models::config::{ExtractionConfig, StexConfig, TableConfig};
pub use models::transaction::Transaction;
pub use session::{Session, SessionPhase};
pub use table::{MIN_VISUAL_ROWS, TableRow, build_rows, format_amount, render_text};
