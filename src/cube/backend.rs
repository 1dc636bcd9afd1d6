//! Generic `{backend, config}` sections used throughout the cube schema.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tagged backend section whose config is opaque to this crate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSection {
    pub backend: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl BackendSection {
    /// Build a section from a backend name and a JSON object. Non-object values yield an empty
    /// config.
    pub fn new(backend: impl Into<String>, config: Value) -> Self {
        let config = match config {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            backend: backend.into(),
            config,
        }
    }
}

/// Optional memory section (`act_mem`, `para_mem`); `{}` means "not configured"
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MemorySection {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub backend: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub config: Map<String, Value>,
}

impl MemorySection {
    pub fn is_empty(&self) -> bool {
        self.backend.is_empty() && self.config.is_empty()
    }
}
