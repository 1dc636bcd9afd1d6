//! Configuration System
//!
//! Application settings for memcube: logging, where published cubes are fetched from, and the
//! deployment settings that shape default cube templates. Layered from defaults, the global
//! config file, workspace config files and `MEMCUBE__*` environment variables.

use crate::cube::validation::ValidationError;
use crate::cube::TemplateSettings;
use crate::logging::LoggingConfig;
use crate::repo::{RepoFetcher, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod defaults;
mod facade;
mod sources;

pub use facade::{ConfigLoader, WORKSPACE_CONFIG_FILE};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemcubeConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Remote cube repositories
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Default cube template settings
    #[serde(default)]
    pub template: TemplateSettings,
}

/// Where and how published cubes are fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Base URL; a cube named `n` is cloned from `{base_url}/{n}`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory fetched cubes are cloned under (temporary directories when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone_root: Option<PathBuf>,

    /// Git executable
    #[serde(default = "default_git_program")]
    pub git_program: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_git_program() -> String {
    "git".to_string()
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            clone_root: None,
            git_program: default_git_program(),
        }
    }
}

impl RepositoryConfig {
    pub fn fetcher(&self) -> RepoFetcher {
        RepoFetcher::with_program(self.git_program.clone())
    }

    /// Clone target for cube `name`, if a clone root is configured
    pub fn clone_dir(&self, name: &str) -> Option<PathBuf> {
        self.clone_root
            .as_ref()
            .map(|root| root.join(name.replace('/', "__")))
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.base_url.trim().is_empty() {
            errors.push(ValidationError::missing("repository.base_url"));
        }
        if self.git_program.trim().is_empty() {
            errors.push(ValidationError::missing("repository.git_program"));
        }
        errors
    }
}

impl MemcubeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        errors.extend(self.logging.validate());
        errors.extend(self.repository.validate());

        if self.template.namespace_prefix.trim().is_empty() {
            errors.push(ValidationError::missing("template.namespace_prefix"));
        }
        if let Err(crate::error::CubeError::Validation(template_errors)) =
            self.template.build_default()
        {
            errors.extend(template_errors.into_iter().map(|e| match e {
                ValidationError::Missing { field } => {
                    ValidationError::missing(format!("template -> {}", field))
                }
                ValidationError::Invalid { field, reason } => {
                    ValidationError::invalid(format!("template -> {}", field), reason)
                }
            }));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
