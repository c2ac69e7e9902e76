//! MergeService: orchestrates sources, applies merge policy, deserializes to TreeConfig.

use crate::config::sources::{environment, global_file};
use crate::config::TreeConfig;
use config::{ConfigError, File};
use std::path::Path;

use super::builder_with_defaults;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from standard sources.
    /// Precedence: defaults (lowest) -> global file -> environment (highest).
    pub fn load() -> Result<TreeConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<TreeConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = builder.add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}
