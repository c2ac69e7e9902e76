//! Global config file source: `$XDG_CONFIG_HOME/runbook-tree/config.toml`

use crate::config::xdg;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};

/// Add the global config file to builder when it can be located.
/// A missing file is not an error.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match xdg::global_config_path() {
        Ok(path) => Ok(builder.add_source(File::from(path).required(false))),
        Err(e) => {
            tracing::debug!("Skipping global config file: {}", e);
            Ok(builder)
        }
    }
}
