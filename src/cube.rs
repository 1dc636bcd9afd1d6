//! Cube Configuration Schema
//!
//! Typed schema for a single cube's configuration record: identity fields, the text-memory
//! section (with its optional graph-database section), and the activation/parametric memory
//! sections. Records are validated on construction from JSON and before any merged record is
//! handed back to a caller.

use crate::error::CubeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub mod backend;
pub mod graph_db;
pub mod store;
pub mod template;
pub mod text_mem;
pub mod validation;

pub use backend::{BackendSection, MemorySection};
pub use graph_db::{GraphDbBackend, GraphDbConfig, GraphDbSection};
pub use store::{init_from_remote_repo, write_config_file, CubeDir, DEFAULT_CONFIG_FILENAME};
pub use template::TemplateSettings;
pub use text_mem::{TextMemorySection, TextMemorySettings};
pub use validation::ValidationError;

/// Schema identifier written into freshly generated records
pub const MODEL_SCHEMA: &str = "memcube.cube.MemCubeConfig";

/// Configuration record for one cube
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MemCubeConfig {
    /// Owning user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Cube identifier, unique per user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cube_id: Option<String>,

    /// File name the record is persisted under inside its cube directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_filename: Option<String>,

    /// Schema identifier of the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_schema: Option<String>,

    /// Textual memory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_mem: Option<TextMemorySection>,

    /// Activation memory
    #[serde(default)]
    pub act_mem: MemorySection,

    /// Parametric memory
    #[serde(default)]
    pub para_mem: MemorySection,

    /// Fields this schema version does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MemCubeConfig {
    /// Parse and validate a record from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, CubeError> {
        let config: MemCubeConfig = serde_json::from_str(json)?;
        config.validated()
    }

    /// Parse and validate a record from a JSON value.
    pub fn from_json_value(value: Value) -> Result<Self, CubeError> {
        let config: MemCubeConfig = serde_json::from_value(value)?;
        config.validated()
    }

    /// Read, parse and validate a record from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, CubeError> {
        let raw = std::fs::read_to_string(path).map_err(|e| CubeError::io(path, e))?;
        let config: MemCubeConfig = serde_json::from_str(&raw).map_err(|e| CubeError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validated()
    }

    /// Serialize the record as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, CubeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the record, returning it unchanged on success.
    pub fn validated(self) -> Result<Self, CubeError> {
        self.validate().map_err(CubeError::Validation)?;
        Ok(self)
    }

    /// Graph-database section, if the text memory has one
    pub fn graph_db(&self) -> Option<&GraphDbSection> {
        self.text_mem.as_ref()?.config.graph_db.as_ref()
    }

    pub fn graph_db_mut(&mut self) -> Option<&mut GraphDbSection> {
        self.text_mem.as_mut()?.config.graph_db.as_mut()
    }
}
