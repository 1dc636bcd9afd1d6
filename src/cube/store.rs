//! Cube directories: a directory holding the cube's `config.json`.

use crate::cube::MemCubeConfig;
use crate::error::CubeError;
use crate::merge::{ConfigMerger, MergeObserver};
use crate::repo::RepoFetcher;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File holding a cube directory's config
pub const DEFAULT_CONFIG_FILENAME: &str = "config.json";

/// A cube directory on local disk
#[derive(Debug, Clone)]
pub struct CubeDir {
    root: PathBuf,
}

impl CubeDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(DEFAULT_CONFIG_FILENAME)
    }

    pub fn exists(&self) -> bool {
        self.config_path().is_file()
    }

    /// Load and validate the cube's config.
    pub fn load(&self) -> Result<MemCubeConfig, CubeError> {
        MemCubeConfig::from_json_file(&self.config_path())
    }

    /// Load the cube's config, upgraded to `default` when one is given. Nothing is written.
    pub fn load_with_default<O: MergeObserver>(
        &self,
        default: Option<&MemCubeConfig>,
        merger: &mut ConfigMerger<O>,
    ) -> Result<MemCubeConfig, CubeError> {
        let config = self.load()?;
        match default {
            Some(default) => merger.merge(&config, default),
            None => Ok(config),
        }
    }

    /// Upgrade the persisted config to `default` and write the result back.
    ///
    /// The file is only replaced after the merge has produced a valid record.
    pub fn upgrade<O: MergeObserver>(
        &self,
        default: &MemCubeConfig,
        merger: &mut ConfigMerger<O>,
    ) -> Result<(MemCubeConfig, PathBuf), CubeError> {
        let merged = self.load_with_default(Some(default), merger)?;
        let path = self.save(&merged)?;
        info!(path = %path.display(), "Upgraded cube config");
        Ok((merged, path))
    }

    /// Write `config` to the directory atomically and return the written path.
    ///
    /// Always writes `config.json`, the file `load` reads. `config_filename` is stored as part
    /// of the record and does not select the file.
    pub fn save(&self, config: &MemCubeConfig) -> Result<PathBuf, CubeError> {
        let path = self.config_path();
        write_config_file(&path, config)?;
        Ok(path)
    }
}

/// Validate `config` and atomically replace `path` with it.
pub fn write_config_file(path: &Path, config: &MemCubeConfig) -> Result<(), CubeError> {
    config.validate().map_err(CubeError::Validation)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| CubeError::io(dir, e))?;

    let json = config.to_json_pretty()?;
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| CubeError::io(dir, e))?;
    temp.write_all(json.as_bytes())
        .and_then(|_| temp.write_all(b"\n"))
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| CubeError::io(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| CubeError::io(path, e.error))?;
    Ok(())
}

/// Fetch a published cube and load its config, upgraded to `default` when one is given.
pub fn init_from_remote_repo<O: MergeObserver>(
    name: &str,
    base_url: &str,
    target_dir: Option<&Path>,
    fetcher: &RepoFetcher,
    default: Option<&MemCubeConfig>,
    merger: &mut ConfigMerger<O>,
) -> Result<(CubeDir, MemCubeConfig), CubeError> {
    let dir = CubeDir::new(fetcher.fetch(name, base_url, target_dir)?);
    if !dir.exists() {
        warn!(path = %dir.config_path().display(), "Fetched repository has no cube config");
    }
    let config = dir.load_with_default(default, merger)?;
    Ok((dir, config))
}
