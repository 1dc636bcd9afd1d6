//! Shared test utilities for integration tests
//!
//! Record builders for cube configs, plus serialized access to the XDG environment so tests
//! that load application config never see the developer's own files.

use memcube::cube::MemCubeConfig;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static XDG_ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variable state to restore after test
struct EnvState {
    home: Option<String>,
    xdg_config_home: Option<String>,
    memcube_env: Option<String>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            home: std::env::var("HOME").ok(),
            xdg_config_home: std::env::var("XDG_CONFIG_HOME").ok(),
            memcube_env: std::env::var("MEMCUBE_ENV").ok(),
        }
    }

    fn restore(self) {
        restore_var("HOME", self.home);
        restore_var("XDG_CONFIG_HOME", self.xdg_config_home);
        restore_var("MEMCUBE_ENV", self.memcube_env);
    }
}

fn restore_var(key: &str, value: Option<String>) {
    match value {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir`.
///
/// The global config file, if a test wants one, lives at `{test_dir}/memcube/config.toml`.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = XDG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_home = test_dir.path().join("home");
    std::fs::create_dir_all(&test_home).unwrap();

    std::env::set_var("HOME", &test_home);
    std::env::set_var("XDG_CONFIG_HOME", test_dir.path());
    std::env::remove_var("MEMCUBE_ENV");

    let result = f();

    env_state.restore();

    result
}

/// Graph-database `config` object
pub fn graph_config(use_multi_db: bool, db_name: &str, user_name: Option<&str>) -> Value {
    let mut config = json!({
        "uri": "bolt://localhost:7687",
        "user": "neo4j",
        "password": "12345678",
        "db_name": db_name,
        "auto_create": true,
        "use_multi_db": use_multi_db,
        "embedding_dimension": 3072,
    });
    if let Some(user_name) = user_name {
        config["user_name"] = json!(user_name);
    }
    config
}

/// Full cube record as JSON; `graph` of `None` leaves out the graph section
pub fn cube_json(user_id: &str, cube_id: &str, graph: Option<Value>) -> Value {
    let mut cube = json!({
        "user_id": user_id,
        "cube_id": cube_id,
        "config_filename": "config.json",
        "model_schema": "memcube.cube.MemCubeConfig",
        "text_mem": {
            "backend": "tree_text",
            "config": {
                "extractor_llm": {
                    "backend": "openai",
                    "config": { "model_name_or_path": "gpt-4o-mini", "temperature": 0.8 }
                },
                "dispatcher_llm": {
                    "backend": "openai",
                    "config": { "model_name_or_path": "gpt-4o-mini", "temperature": 0.8 }
                },
                "embedder": {
                    "backend": "ollama",
                    "config": { "model_name_or_path": "nomic-embed-text:latest" }
                },
                "reorganize": false
            }
        },
        "act_mem": {},
        "para_mem": {}
    });
    if let Some(graph) = graph {
        cube["text_mem"]["config"]["graph_db"] = json!({ "backend": "neo4j", "config": graph });
    }
    cube
}

pub fn cube(user_id: &str, cube_id: &str, graph: Option<Value>) -> MemCubeConfig {
    MemCubeConfig::from_json_value(cube_json(user_id, cube_id, graph)).unwrap()
}

/// Write a record as pretty JSON
pub fn write_json(path: &Path, value: &Value) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Read a JSON file back as a value
pub fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}
