//! The extraction capability seam.

use std::future::Future;

use stex_core::{EncodedDocument, Transaction};

use crate::Result;

/// Capability for turning an encoded document into transaction rows.
///
/// Implementations issue at most one extraction attempt per call: no
/// retry, no streaming, no pagination. A call either yields a decoded
/// sequence (possibly empty, meaning no transactions were found) or fails
/// as a whole.
pub trait DocumentExtractor {
    /// Extract the transaction table from one document.
    fn extract(
        &self,
        document: &EncodedDocument,
    ) -> impl Future<Output = Result<Vec<Transaction>>> + Send;
}

/// Canned extractor for tests and offline runs.
///
/// Returns a fixed sequence, or a fixed service failure when constructed
/// with [`MockExtractor::failing`].
#[derive(Debug, Clone, Default)]
pub struct MockExtractor {
    rows: Vec<Transaction>,
    failure: Option<String>,
}

impl MockExtractor {
    /// Extractor that always succeeds with the given rows.
    pub fn with_rows(rows: Vec<Transaction>) -> Self {
        Self {
            rows,
            failure: None,
        }
    }

    /// Extractor that always fails with the given service message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            rows: Vec::new(),
            failure: Some(message.into()),
        }
    }
}

impl DocumentExtractor for MockExtractor {
    async fn extract(&self, _document: &EncodedDocument) -> Result<Vec<Transaction>> {
        match &self.failure {
            Some(message) => Err(crate::ExtractError::Service {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(self.rows.clone()),
        }
    }
}
