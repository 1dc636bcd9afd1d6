//! CLI parse: clap types for memcube. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// memcube - manage and upgrade memory cube configurations
#[derive(Parser, Debug)]
#[command(name = "memcube")]
#[command(about = "Manage memory cube configurations and upgrade them to new default templates")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge an existing cube config with a default template
    Merge {
        /// Existing cube config (JSON)
        #[arg(long)]
        existing: PathBuf,
        /// Default template (JSON)
        #[arg(long)]
        default: PathBuf,
        /// Write the merged config here instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Upgrade a cube directory's config in place
    Upgrade {
        /// Cube directory containing config.json
        dir: PathBuf,
        /// Default template (JSON); the configured template is used when omitted
        #[arg(long)]
        default: Option<PathBuf>,
        /// Show the result without writing it
        #[arg(long)]
        dry_run: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Fetch a published cube repository
    Fetch {
        /// Repository name, appended to the base URL
        name: String,
        /// Base URL (defaults to repository.base_url)
        #[arg(long)]
        base_url: Option<String>,
        /// Clone into this directory (defaults to repository.clone_root or a temporary directory)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Upgrade the fetched config to this default template (JSON)
        #[arg(long)]
        default: Option<PathBuf>,
    },
    /// Print a default cube template for a user
    Template {
        #[arg(long)]
        user_id: String,
        /// Display name used in the cube id (defaults to the user id)
        #[arg(long)]
        user_name: Option<String>,
        /// Write the template here instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Parse and validate a cube config
    Validate {
        file: PathBuf,
    },
    /// Write the default application configuration to config/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    /// Stable command name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Merge { .. } => "merge",
            Commands::Upgrade { .. } => "upgrade",
            Commands::Fetch { .. } => "fetch",
            Commands::Template { .. } => "template",
            Commands::Validate { .. } => "validate",
            Commands::Init { .. } => "init",
        }
    }
}
