//! Built-in defaults, lowest precedence layer.

use crate::repo::DEFAULT_BASE_URL;
use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with the built-in defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("repository.base_url", DEFAULT_BASE_URL)?
        .set_default("repository.git_program", "git")?
        .set_default("template.namespace_prefix", "memcube")
}
