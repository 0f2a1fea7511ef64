//! Session lifecycle: one explicit state machine per extraction cycle.
//!
//! The session owns the current uploaded file, the decoded rows and the
//! last error message. Transitions follow a fixed table; anything outside
//! it is rejected rather than silently coerced:
//!
//! - `Idle -> Idle` on file selection (replaces the file, clears errors)
//! - `Idle -> Processing` on extract (requires a selected file)
//! - `Processing -> Success` on a decoded sequence, even an empty one
//! - `Processing -> Error` on intake-encoding or extraction failure
//! - `Success -> Idle` / `Error -> Idle` on clear
//!
//! Re-entering `Processing` while already processing is refused, which is
//! what keeps at most one extraction in flight.

use tracing::{debug, warn};

use crate::error::SessionError;
use crate::intake::UploadedFile;
use crate::models::transaction::Transaction;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Processing,
    Success,
    Error,
}

/// The single per-cycle mutable record of file, results and phase.
#[derive(Debug)]
pub struct Session {
    phase: SessionPhase,
    file: Option<UploadedFile>,
    transactions: Vec<Transaction>,
    error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            file: None,
            transactions: Vec::new(),
            error: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    /// Decoded rows from the last successful extraction, in document order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Select a file, replacing any prior one and clearing a stale error.
    ///
    /// Permitted while `Idle` or `Error`; refused while an extraction is in
    /// flight or results are still on display.
    pub fn select_file(&mut self, file: UploadedFile) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Processing => Err(SessionError::Busy),
            SessionPhase::Success => Err(SessionError::Phase(self.phase)),
            SessionPhase::Idle | SessionPhase::Error => {
                debug!("selected {}", file.descriptor());
                self.file = Some(file);
                self.error = None;
                self.phase = SessionPhase::Idle;
                Ok(())
            }
        }
    }

    /// Start an extraction attempt. Requires a selected file; a second
    /// attempt while one is in flight is refused so callers can treat it
    /// as a no-op.
    pub fn begin_processing(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Processing => {
                warn!("extraction requested while already processing");
                Err(SessionError::Busy)
            }
            SessionPhase::Success => Err(SessionError::Phase(self.phase)),
            SessionPhase::Idle | SessionPhase::Error => {
                if self.file.is_none() {
                    return Err(SessionError::NoFile);
                }
                self.error = None;
                self.phase = SessionPhase::Processing;
                Ok(())
            }
        }
    }

    /// Record a decoded sequence, replacing any prior one wholesale. An
    /// empty sequence is a success: the document simply had no rows.
    pub fn complete(&mut self, transactions: Vec<Transaction>) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Processing {
            return Err(SessionError::Phase(self.phase));
        }
        debug!("extraction succeeded with {} rows", transactions.len());
        self.transactions = transactions;
        self.phase = SessionPhase::Success;
        Ok(())
    }

    /// Record a failure message. The uploaded file is retained so the user
    /// can retry without re-uploading.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Processing {
            return Err(SessionError::Phase(self.phase));
        }
        let message = message.into();
        warn!("extraction failed: {}", message);
        self.error = Some(message);
        self.phase = SessionPhase::Error;
        Ok(())
    }

    /// Reset wholesale to `Idle`, discarding the file, rows and error.
    pub fn clear(&mut self) {
        self.file = None;
        self.transactions = Vec::new();
        self.error = None;
        self.phase = SessionPhase::Idle;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
