//! Error types for the extraction client layer.

use thiserror::Error;

/// Fallback shown when a failure carries no usable detail of its own.
pub const GENERIC_FAILURE: &str = "An unexpected error occurred while processing the file.";

/// Errors that can occur while obtaining rows from an extraction service.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Transport-level failure (connect, timeout, TLS, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status. `message` is empty
    /// when the error body carried no readable message.
    #[error("extraction service returned status {status}: {message}")]
    Service { status: u16, message: String },

    /// The response body violated the extraction contract.
    #[error("contract violation: {0}")]
    Contract(#[from] stex_core::ContractError),

    /// No API credential was provided.
    #[error("missing API credential (set GEMINI_API_KEY or extraction.api_key in the config)")]
    MissingCredential,
}

impl ExtractError {
    /// Single displayable message for the session error surface: the
    /// underlying message when available, else a generic fallback.
    pub fn display_message(&self) -> String {
        match self {
            ExtractError::Service { message, .. } if !message.is_empty() => message.clone(),
            ExtractError::MissingCredential => self.to_string(),
            ExtractError::Contract(_) | ExtractError::Http(_) => {
                format!("Failed to extract data from document: {self}")
            }
            ExtractError::Service { .. } => GENERIC_FAILURE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_message_prefers_service_detail() {
        let err = ExtractError::Service {
            status: 429,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(err.display_message(), "quota exceeded");
    }

    #[test]
    fn test_display_message_falls_back_when_detail_is_absent() {
        let err = ExtractError::Service {
            status: 502,
            message: String::new(),
        };
        assert_eq!(err.display_message(), GENERIC_FAILURE);
    }
}
