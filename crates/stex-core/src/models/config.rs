//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StexError};

/// Main configuration for the stex pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StexConfig {
    /// Extraction service configuration.
    pub extraction: ExtractionConfig,

    /// Result table configuration.
    pub table: TableConfig,
}

impl Default for StexConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            table: TableConfig::default(),
        }
    }
}

/// Extraction service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Model identifier on the hosted service.
    pub model: String,

    /// Base endpoint of the hosted service API.
    pub endpoint: String,

    /// Request timeout in seconds. The upstream call has no streaming or
    /// retry; when the timeout elapses the attempt fails as a whole.
    pub timeout_secs: u64,

    /// API credential. Usually left unset in favour of the
    /// GEMINI_API_KEY environment variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 120,
            api_key: None,
        }
    }
}

/// Result table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Minimum visual row count; shorter results are padded with blank
    /// placeholder rows purely for presentation.
    pub min_rows: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_rows: crate::table::MIN_VISUAL_ROWS,
        }
    }
}

impl StexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| StexError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| StexError::Config(e.to_string()))?;
        Ok(std::fs::write(path, content)?)
    }
}
