//! Single entry point for loading application configuration.

use super::defaults::builder_with_defaults;
use super::sources::{global_file, workspace_file};
use super::MemcubeConfig;
use crate::error::CubeError;
use config::{ConfigError, Environment, File};
use std::path::{Path, PathBuf};

/// Workspace config file written by `memcube init`
pub const WORKSPACE_CONFIG_FILE: &str = "config/config.toml";

/// Loads [`MemcubeConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (highest last): defaults, global config file, `config/config.toml`,
    /// `config/{MEMCUBE_ENV}.toml`, `MEMCUBE__SECTION__KEY` environment variables.
    pub fn load(workspace_root: &Path) -> Result<MemcubeConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        builder.add_source(env_source()).build()?.try_deserialize()
    }

    /// Load configuration from one explicit file; only defaults and environment apply besides it.
    pub fn load_from_file(path: &Path) -> Result<MemcubeConfig, ConfigError> {
        builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Default configuration rendered as TOML
    pub fn default_toml() -> Result<String, CubeError> {
        toml::to_string_pretty(&MemcubeConfig::default())
            .map_err(|e| CubeError::ConfigError(format!("Failed to render configuration: {}", e)))
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("MEMCUBE")
        .prefix_separator("__")
        .separator("__")
}
