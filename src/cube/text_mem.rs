//! Textual memory section.

use crate::cube::backend::BackendSection;
use crate::cube::graph_db::GraphDbSection;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `text_mem` section: `{backend, config}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMemorySection {
    pub backend: String,
    #[serde(default)]
    pub config: TextMemorySettings,
}

/// Settings inside `text_mem.config`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextMemorySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor_llm: Option<BackendSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatcher_llm: Option<BackendSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedder: Option<BackendSection>,

    /// Graph database backing tree-structured memories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_db: Option<GraphDbSection>,

    /// Periodic memory reorganization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reorganize: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internet_retriever: Option<BackendSection>,

    /// Backend-specific settings not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
