//! Panel configuration
//!
//! Loaded from an optional YAML file; every field has a default so an empty
//! file (or no file at all) gives the stock behaviour.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default quiet period before an edited document is rescanned
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Debounce delay for edit-triggered rescans, in milliseconds
    pub debounce_ms: u64,
    /// File extensions treated as trackable text documents
    pub document_extensions: Vec<String>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            document_extensions: vec!["md".to_string()],
        }
    }
}

impl PanelConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Whether a document of this kind (file extension) can be tracked
    pub fn is_trackable(&self, kind: &str) -> bool {
        self.document_extensions.iter().any(|ext| ext == kind)
    }
}
