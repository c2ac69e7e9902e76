//! Merge policy: defaults every source is layered over.

pub mod service;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with the built-in defaults (lowest precedence).
pub(crate) fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("load_policy", "strict")?
        .set_default("delete_strategy", "decline")?
        .set_default("traversal_order", "depth_first")
}
