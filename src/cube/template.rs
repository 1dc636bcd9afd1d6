//! Default cube templates built from deployment settings.

use crate::cube::{
    BackendSection, GraphDbBackend, GraphDbConfig, GraphDbSection, MemCubeConfig, MemorySection,
    TextMemorySection, TextMemorySettings, DEFAULT_CONFIG_FILENAME, MODEL_SCHEMA,
};
use crate::error::CubeError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Deployment settings that shape a default cube template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSettings {
    /// Graph database backend
    #[serde(default = "default_graph_backend")]
    pub graph_backend: GraphDbBackend,

    /// For the `neo4j` backend: one shared database (true) or a database per cube (false).
    /// `neo4j-community` always uses a shared database.
    #[serde(default)]
    pub shared_db: bool,

    /// Prefix for per-user tenant and database names
    #[serde(default = "default_namespace_prefix")]
    pub namespace_prefix: String,

    #[serde(default = "default_text_backend")]
    pub text_backend: String,

    #[serde(default)]
    pub neo4j: Neo4jSettings,

    /// LLM used for both extraction and dispatch
    #[serde(default = "default_llm")]
    pub llm: BackendSection,

    #[serde(default = "default_embedder")]
    pub embedder: BackendSection,

    #[serde(default)]
    pub reorganize: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internet_retriever: Option<BackendSection>,
}

/// Neo4j connection defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neo4jSettings {
    #[serde(default = "default_neo4j_uri")]
    pub uri: String,
    #[serde(default = "default_neo4j_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    /// Database shared by all tenants in shared-database mode
    #[serde(default = "default_shared_db_name")]
    pub shared_db_name: String,
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: u32,
}

fn default_graph_backend() -> GraphDbBackend {
    GraphDbBackend::Neo4jCommunity
}

fn default_namespace_prefix() -> String {
    "memcube".to_string()
}

fn default_text_backend() -> String {
    "tree_text".to_string()
}

fn default_neo4j_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_neo4j_user() -> String {
    "neo4j".to_string()
}

fn default_shared_db_name() -> String {
    "shared-tree-textual-memory".to_string()
}

fn default_embedding_dimension() -> u32 {
    3072
}

fn default_llm() -> BackendSection {
    BackendSection::new(
        "openai",
        json!({
            "model_name_or_path": "gpt-4o-mini",
            "temperature": 0.8,
            "max_tokens": 1024,
            "top_p": 0.9,
            "top_k": 50,
            "api_base": "https://api.openai.com/v1",
        }),
    )
}

fn default_embedder() -> BackendSection {
    BackendSection::new(
        "ollama",
        json!({
            "model_name_or_path": "nomic-embed-text:latest",
            "api_base": "http://localhost:11434",
        }),
    )
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: default_neo4j_uri(),
            user: default_neo4j_user(),
            password: String::new(),
            shared_db_name: default_shared_db_name(),
            embedding_dimension: default_embedding_dimension(),
        }
    }
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            graph_backend: default_graph_backend(),
            shared_db: false,
            namespace_prefix: default_namespace_prefix(),
            text_backend: default_text_backend(),
            neo4j: Neo4jSettings::default(),
            llm: default_llm(),
            embedder: default_embedder(),
            reorganize: false,
            internet_retriever: None,
        }
    }
}

impl TemplateSettings {
    /// Tenant/database name for a user: prefix plus the user id without dashes
    pub fn tenant_name(&self, user_id: &str) -> String {
        format!("{}{}", self.namespace_prefix, user_id.replace('-', ""))
    }

    /// Graph section for `user_id` according to the configured backend and mode
    pub fn graph_db_section(&self, user_id: &str) -> GraphDbSection {
        let neo4j = &self.neo4j;
        let shared = self.graph_backend == GraphDbBackend::Neo4jCommunity || self.shared_db;

        let mut extra = Map::new();
        if self.graph_backend == GraphDbBackend::Neo4jCommunity {
            extra.insert("vec_config".to_string(), self.vec_config());
        }

        let (db_name, user_name) = if shared {
            (neo4j.shared_db_name.clone(), Some(self.tenant_name(user_id)))
        } else {
            (self.tenant_name(user_id), None)
        };

        GraphDbSection {
            backend: self.graph_backend,
            config: GraphDbConfig {
                uri: neo4j.uri.clone(),
                user: Some(neo4j.user.clone()).filter(|u| !u.is_empty()),
                password: Some(neo4j.password.clone()).filter(|p| !p.is_empty()),
                db_name,
                user_name,
                auto_create: true,
                use_multi_db: !shared,
                embedding_dimension: Some(neo4j.embedding_dimension),
                extra,
            },
        }
    }

    /// External vector store paired with the community backend
    fn vec_config(&self) -> Value {
        json!({
            "backend": "qdrant",
            "config": {
                "collection_name": "neo4j_vec_db",
                "vector_dimension": self.neo4j.embedding_dimension,
                "distance_metric": "cosine",
                "host": "localhost",
                "port": 6333,
            }
        })
    }

    /// Default template for a user's own cube (`{user_name}_default_cube`).
    pub fn build(&self, user_id: &str, user_name: &str) -> Result<MemCubeConfig, CubeError> {
        self.assemble(user_id, format!("{}_default_cube", user_name))
    }

    /// Process-wide default template used to upgrade existing cubes.
    pub fn build_default(&self) -> Result<MemCubeConfig, CubeError> {
        self.assemble("default", "default_cube".to_string())
    }

    fn assemble(&self, user_id: &str, cube_id: String) -> Result<MemCubeConfig, CubeError> {
        MemCubeConfig {
            user_id: Some(user_id.to_string()),
            cube_id: Some(cube_id),
            config_filename: Some(DEFAULT_CONFIG_FILENAME.to_string()),
            model_schema: Some(MODEL_SCHEMA.to_string()),
            text_mem: Some(TextMemorySection {
                backend: self.text_backend.clone(),
                config: TextMemorySettings {
                    extractor_llm: Some(self.llm.clone()),
                    dispatcher_llm: Some(self.llm.clone()),
                    embedder: Some(self.embedder.clone()),
                    graph_db: Some(self.graph_db_section(user_id)),
                    reorganize: Some(self.reorganize),
                    internet_retriever: self.internet_retriever.clone(),
                    extra: Map::new(),
                },
            }),
            act_mem: MemorySection::default(),
            para_mem: MemorySection::default(),
            extra: Map::new(),
        }
        .validated()
    }
}
