//! Workspace config file source: config/config.toml and config/{MEMCUBE_ENV}.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::WORKSPACE_CONFIG_FILE;

const DEFAULT_ENV: &str = "development";

/// Deployment environment selecting the overlay file. Unset or blank means `development`.
pub fn env_name() -> String {
    std::env::var("MEMCUBE_ENV")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_ENV.to_string())
}

/// Workspace config files that exist, lowest precedence first.
pub fn existing_files(workspace_root: &Path, env_name: &str) -> Result<Vec<PathBuf>, ConfigError> {
    if env_name.contains(['/', '\\']) || env_name == ".." {
        return Err(ConfigError::Message(format!(
            "MEMCUBE_ENV must be a plain name, got '{}'",
            env_name
        )));
    }
    let base = workspace_root.join(WORKSPACE_CONFIG_FILE);
    let overlay = base.with_file_name(format!("{}.toml", env_name));

    let mut files = vec![base];
    if overlay != files[0] {
        files.push(overlay);
    }
    files.retain(|p| p.is_file());
    Ok(files)
}

/// Add workspace config files to builder; the environment overlay wins over the base file.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let env_name = env_name();
    let files = existing_files(workspace_root, &env_name)?;
    if files.is_empty() {
        debug!(workspace = %workspace_root.display(), env = %env_name, "No workspace configuration");
    }
    for path in files {
        debug!(config_path = %path.display(), "Using workspace configuration");
        builder = builder.add_source(File::from(path).required(false));
    }
    Ok(builder)
}
