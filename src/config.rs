//! Import settings shared by the file reader and title derivation

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_FALLBACK_TITLE: &str = "Imported quiz";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Files larger than this are refused before parsing starts.
    pub max_document_bytes: u64,
    /// Title used when a file name yields nothing usable.
    pub fallback_title: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            fallback_title: DEFAULT_FALLBACK_TITLE.to_string(),
        }
    }
}

impl ImportConfig {
    /// Load settings from a (possibly partial) JSON object
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_max_document_bytes(mut self, limit: u64) -> Self {
        self.max_document_bytes = limit;
        self
    }
}
