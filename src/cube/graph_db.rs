//! Graph database section of the textual memory.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Supported graph database backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphDbBackend {
    #[serde(rename = "neo4j")]
    Neo4j,
    #[serde(rename = "neo4j-community")]
    Neo4jCommunity,
}

impl GraphDbBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphDbBackend::Neo4j => "neo4j",
            GraphDbBackend::Neo4jCommunity => "neo4j-community",
        }
    }
}

impl fmt::Display for GraphDbBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GraphDbBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "neo4j" => Ok(GraphDbBackend::Neo4j),
            "neo4j-community" => Ok(GraphDbBackend::Neo4jCommunity),
            other => Err(format!(
                "Invalid graph db backend: {} (must be 'neo4j' or 'neo4j-community')",
                other
            )),
        }
    }
}

/// `graph_db` tagged union: `{backend, config}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDbSection {
    pub backend: GraphDbBackend,
    pub config: GraphDbConfig,
}

/// Graph database connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDbConfig {
    /// Connection URI, e.g. `bolt://localhost:7687`
    pub uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Target database. In multi-database mode this is the cube's own database.
    pub db_name: String,

    /// Logical tenant inside a shared database; required when `use_multi_db` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    #[serde(default)]
    pub auto_create: bool,

    /// One database per cube (true) or one shared database partitioned by `user_name` (false)
    #[serde(default = "default_use_multi_db")]
    pub use_multi_db: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_dimension: Option<u32>,

    /// Backend-specific settings (e.g. `vec_config`)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_use_multi_db() -> bool {
    true
}
