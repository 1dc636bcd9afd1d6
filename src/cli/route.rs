//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_merge_result, format_validate_result, OutputFormat};
use crate::config::{ConfigLoader, MemcubeConfig, WORKSPACE_CONFIG_FILE};
use crate::cube::{init_from_remote_repo, write_config_file, CubeDir, MemCubeConfig};
use crate::error::CubeError;
use crate::merge::{ConfigMerger, MergeReport, TracingObserver};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

type ReportingMerger = ConfigMerger<(TracingObserver, MergeReport)>;

fn reporting_merger() -> ReportingMerger {
    ConfigMerger::with_observer((TracingObserver, MergeReport::new()))
}

/// Runtime context for CLI execution: workspace and loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: MemcubeConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, CubeError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        config.validate().map_err(CubeError::Validation)?;
        Ok(Self::with_config(workspace_root, config))
    }

    /// Run context over an already loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: MemcubeConfig) -> Self {
        Self {
            workspace_root,
            config,
        }
    }

    pub fn config(&self) -> &MemcubeConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, CubeError> {
        let started = Instant::now();
        let result = self.execute_inner(command);
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => info!(command = command.name(), elapsed_ms, "Command finished"),
            Err(e) => warn!(command = command.name(), elapsed_ms, error = %e, "Command failed"),
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, CubeError> {
        match command {
            Commands::Merge {
                existing,
                default,
                output,
                format,
            } => self.handle_merge(existing, default, output.as_deref(), format.parse()?),
            Commands::Upgrade {
                dir,
                default,
                dry_run,
                format,
            } => self.handle_upgrade(dir, default.as_deref(), *dry_run, format.parse()?),
            Commands::Fetch {
                name,
                base_url,
                dir,
                default,
            } => self.handle_fetch(name, base_url.as_deref(), dir.as_deref(), default.as_deref()),
            Commands::Template {
                user_id,
                user_name,
                output,
            } => self.handle_template(user_id, user_name.as_deref(), output.as_deref()),
            Commands::Validate { file } => {
                let path = self.resolve(file);
                let config = MemCubeConfig::from_json_file(&path)?;
                Ok(format_validate_result(&path, &config))
            }
            Commands::Init { force } => self.handle_init(*force),
        }
    }

    /// Relative paths are taken relative to the workspace root.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        }
    }

    /// Default template from a file, or the configured template when none is given.
    fn load_default(&self, path: Option<&Path>) -> Result<MemCubeConfig, CubeError> {
        match path {
            Some(path) => MemCubeConfig::from_json_file(&self.resolve(path)),
            None => self.config.template.build_default(),
        }
    }

    fn handle_merge(
        &self,
        existing: &Path,
        default: &Path,
        output: Option<&Path>,
        format: OutputFormat,
    ) -> Result<String, CubeError> {
        let existing = MemCubeConfig::from_json_file(&self.resolve(existing))?;
        let default = MemCubeConfig::from_json_file(&self.resolve(default))?;

        let mut merger = reporting_merger();
        let merged = merger.merge(&existing, &default)?;
        let (_, report) = merger.into_observer();

        let written = match output {
            Some(path) => {
                let path = self.resolve(path);
                write_config_file(&path, &merged)?;
                Some(path)
            }
            None => None,
        };
        format_merge_result(&merged, &report, written.as_deref(), format)
    }

    fn handle_upgrade(
        &self,
        dir: &Path,
        default: Option<&Path>,
        dry_run: bool,
        format: OutputFormat,
    ) -> Result<String, CubeError> {
        let default = self.load_default(default)?;
        let cube = CubeDir::new(self.resolve(dir));
        let mut merger = reporting_merger();

        let (merged, written) = if dry_run {
            (cube.load_with_default(Some(&default), &mut merger)?, None)
        } else {
            let (merged, path) = cube.upgrade(&default, &mut merger)?;
            (merged, Some(path))
        };
        let (_, report) = merger.into_observer();
        format_merge_result(&merged, &report, written.as_deref(), format)
    }

    fn handle_fetch(
        &self,
        name: &str,
        base_url: Option<&str>,
        dir: Option<&Path>,
        default: Option<&Path>,
    ) -> Result<String, CubeError> {
        let repository = &self.config.repository;
        let base_url = base_url.unwrap_or(repository.base_url.as_str());
        let target = dir
            .map(|d| self.resolve(d))
            .or_else(|| repository.clone_dir(name));
        let default = default.map(|d| self.load_default(Some(d))).transpose()?;

        let mut merger = reporting_merger();
        let (cube, config) = init_from_remote_repo(
            name,
            base_url,
            target.as_deref(),
            &repository.fetcher(),
            default.as_ref(),
            &mut merger,
        )?;

        let mut out = format!("Fetched {} into {}", name, cube.root().display());
        if default.is_some() {
            let path = cube.save(&config)?;
            out.push_str(&format!("\nUpgraded {}", path.display()));
        }
        out.push('\n');
        out.push_str(&format_validate_result(&cube.config_path(), &config));
        Ok(out)
    }

    fn handle_template(
        &self,
        user_id: &str,
        user_name: Option<&str>,
        output: Option<&Path>,
    ) -> Result<String, CubeError> {
        let template = self
            .config
            .template
            .build(user_id, user_name.unwrap_or(user_id))?;
        match output {
            Some(path) => {
                let path = self.resolve(path);
                write_config_file(&path, &template)?;
                Ok(format!("Wrote template to {}", path.display()))
            }
            None => template.to_json_pretty(),
        }
    }

    fn handle_init(&self, force: bool) -> Result<String, CubeError> {
        let path = self.workspace_root.join(WORKSPACE_CONFIG_FILE);
        if path.exists() && !force {
            return Err(CubeError::ConfigError(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CubeError::io(parent, e))?;
        }
        std::fs::write(&path, ConfigLoader::default_toml()?).map_err(|e| CubeError::io(&path, e))?;
        Ok(format!("Wrote {}", path.display()))
    }
}
