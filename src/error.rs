//! Error types for cube configuration management.

use crate::cube::validation::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of an external process (the version-control client)
#[derive(Debug, Clone, Error)]
#[error("`{program} {args}` failed ({exit}): {stderr}", exit = describe_status(.status))]
pub struct ExternalToolError {
    pub program: String,
    pub args: String,
    /// Exit code, or `None` when the process never started or was killed by a signal
    pub status: Option<i32>,
    pub stderr: String,
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "did not run to completion".to_string(),
    }
}

/// Top-level error for merge, storage, fetch and configuration operations
#[derive(Debug, Error)]
pub enum CubeError {
    #[error("Cube configuration is invalid:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    ExternalTool(#[from] ExternalToolError),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed cube config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CubeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CubeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Validation problems, if this is a validation failure
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            CubeError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for CubeError {
    fn from(err: config::ConfigError) -> Self {
        CubeError::ConfigError(err.to_string())
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}
