//! Remote cube repositories: clone `base_url/name` with the external `git` client.

use crate::cube::validation::ValidationError;
use crate::error::{CubeError, ExternalToolError};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Default location of published cubes
pub const DEFAULT_BASE_URL: &str = "https://huggingface.co/datasets";

/// Clones cube repositories
#[derive(Debug, Clone)]
pub struct RepoFetcher {
    git_program: String,
}

impl Default for RepoFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RepoFetcher {
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use a specific git executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            git_program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.git_program
    }

    /// Clone `base_url/name` into `target_dir`, or into a fresh temporary directory when none is
    /// given. Returns the local checkout path. Failures are not retried.
    pub fn fetch(
        &self,
        name: &str,
        base_url: &str,
        target_dir: Option<&Path>,
    ) -> Result<PathBuf, CubeError> {
        let name = name.trim_matches('/');
        if name.is_empty() {
            return Err(CubeError::Validation(vec![ValidationError::missing("name")]));
        }
        let repo_url = format!("{}/{}", base_url.trim_end_matches('/'), name);

        let (dir, is_temp) = match target_dir {
            Some(dir) => (dir.to_path_buf(), false),
            None => {
                let temp = tempfile::Builder::new()
                    .prefix("memcube-")
                    .tempdir()
                    .map_err(|e| CubeError::io(std::env::temp_dir(), e))?;
                (temp.keep(), true)
            }
        };

        info!(url = %repo_url, target = %dir.display(), "Cloning repository");
        match self.clone_into(&repo_url, &dir) {
            Ok(()) => {
                debug!(target = %dir.display(), "Clone finished");
                Ok(dir)
            }
            Err(err) => {
                if is_temp {
                    if let Err(e) = std::fs::remove_dir_all(&dir) {
                        warn!(path = %dir.display(), error = %e, "Failed to remove temporary clone directory");
                    }
                }
                Err(err.into())
            }
        }
    }

    fn clone_into(&self, repo_url: &str, dir: &Path) -> Result<(), ExternalToolError> {
        let dir_arg = dir.to_string_lossy();
        let args = ["clone", repo_url, dir_arg.as_ref()];
        let failure = |status: Option<i32>, stderr: String| ExternalToolError {
            program: self.git_program.clone(),
            args: args.join(" "),
            status,
            stderr,
        };

        let output = Command::new(&self.git_program)
            .args(args)
            .output()
            .map_err(|e| failure(None, e.to_string()))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(failure(
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}

/// Clone with the system `git`.
pub fn fetch_repository(
    name: &str,
    base_url: &str,
    target_dir: Option<&Path>,
) -> Result<PathBuf, CubeError> {
    RepoFetcher::new().fetch(name, base_url, target_dir)
}
