//! Configuration
//!
//! Layered settings for tree loading, default structural-edit behavior and
//! logging. Sources are merged with the `config` crate: built-in defaults,
//! the global config file, an explicit file, then `RUNBOOK_TREE__*`
//! environment variables.

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;

use crate::logging::LoggingConfig;
use crate::tree::LoadPolicy;
use crate::types::{DeleteStrategy, TraversalOrder};
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeConfig {
    /// How serialized trees with non-contiguous indices are loaded
    #[serde(default)]
    pub load_policy: LoadPolicy,

    /// Strategy used when a delete does not name one
    #[serde(default)]
    pub delete_strategy: DeleteStrategy,

    /// Order used when a traversal does not name one
    #[serde(default)]
    pub traversal_order: TraversalOrder,

    #[serde(default)]
    pub logging: LoggingConfig,
}
