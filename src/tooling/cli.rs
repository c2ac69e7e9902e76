//! CLI Tooling
//!
//! Command-line interface for inspecting and editing serialized trees stored
//! as JSON files. Mutating commands rewrite the file in place.

use crate::config::{ConfigLoader, TreeConfig};
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::tree::{Node, SerializedTree, Tree};
use crate::types::{DeleteStrategy, NodeId, TraversalOrder};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runbook tree CLI - inspect and edit ordered document trees
#[derive(Parser, Debug)]
#[command(name = "runbook-tree")]
#[command(about = "Inspect and edit serialized runbook document trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold logging flags over the configured logging settings
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the tree as an indented outline or nested JSON
    Show {
        /// Serialized tree file
        file: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List node ids in traversal order
    Traverse {
        file: PathBuf,
        /// Traversal order (dfs or bfs); defaults to the configured order
        #[arg(long)]
        order: Option<String>,
        /// Start node (defaults to the root)
        #[arg(long)]
        from: Option<String>,
    },
    /// Check that a file holds a well-formed tree
    Validate { file: PathBuf },
    /// Create a node
    Add {
        file: PathBuf,
        id: String,
        /// Parent node (defaults to the root)
        #[arg(long)]
        parent: Option<String>,
        /// Sibling position (appended when omitted)
        #[arg(long)]
        index: Option<usize>,
        /// JSON payload
        #[arg(long)]
        data: Option<String>,
    },
    /// Move a node under a new parent or next to another node
    Move {
        file: PathBuf,
        id: String,
        /// New parent (defaults to the root)
        #[arg(long, conflicts_with_all = ["before", "after"])]
        parent: Option<String>,
        /// Sibling position under the new parent
        #[arg(long, conflicts_with_all = ["before", "after"])]
        index: Option<usize>,
        /// Place the node immediately before this one
        #[arg(long, conflicts_with = "after")]
        before: Option<String>,
        /// Place the node immediately after this one
        #[arg(long)]
        after: Option<String>,
    },
    /// Delete a node
    Delete {
        file: PathBuf,
        id: String,
        /// decline, cascade, or reattach; defaults to the configured strategy
        #[arg(long)]
        strategy: Option<String>,
    },
}

/// Execution context holding resolved configuration
pub struct CliContext {
    config: TreeConfig,
}

impl CliContext {
    /// Create a new CLI context, loading configuration
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        info!(command = command_name(command), "executing command");
        match command {
            Commands::Show { file, format } => self.handle_show(file, format),
            Commands::Traverse { file, order, from } => {
                self.handle_traverse(file, order.as_deref(), from.as_deref())
            }
            Commands::Validate { file } => self.handle_validate(file),
            Commands::Add {
                file,
                id,
                parent,
                index,
                data,
            } => self.handle_add(file, id, parent.as_deref(), *index, data.as_deref()),
            Commands::Move {
                file,
                id,
                parent,
                index,
                before,
                after,
            } => {
                let target = match (before, after) {
                    (Some(anchor), _) => MoveTarget::Before(anchor),
                    (None, Some(anchor)) => MoveTarget::After(anchor),
                    (None, None) => MoveTarget::Under(parent.as_deref(), *index),
                };
                self.handle_move(file, id, target)
            }
            Commands::Delete { file, id, strategy } => {
                self.handle_delete(file, id, strategy.as_deref())
            }
        }
    }

    fn load_tree(&self, path: &Path) -> Result<Node<Value>, ApiError> {
        let content = std::fs::read_to_string(path)?;
        let data: SerializedTree<Value> = serde_json::from_str(&content)?;
        debug!(path = %path.display(), entries = data.len(), "read serialized tree");
        Ok(Tree::from_serialized_with(data, self.config.load_policy)?)
    }

    fn save_tree(&self, path: &Path, root: &Node<Value>) -> Result<(), ApiError> {
        let content = serde_json::to_string_pretty(&root.tree().to_serialized())?;
        std::fs::write(path, content + "\n")?;
        debug!(path = %path.display(), nodes = root.tree().len(), "wrote serialized tree");
        Ok(())
    }

    fn handle_show(&self, file: &Path, format: &str) -> Result<String, ApiError> {
        let root = self.load_tree(file)?;
        match format {
            "json" => Ok(serde_json::to_string_pretty(&root.json_tree()?)?),
            "text" => format_outline(&root),
            other => Err(ApiError::InvalidArgument(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }

    fn handle_traverse(
        &self,
        file: &Path,
        order: Option<&str>,
        from: Option<&str>,
    ) -> Result<String, ApiError> {
        let root = self.load_tree(file)?;
        let order = match order {
            Some(order) => order
                .parse::<TraversalOrder>()
                .map_err(ApiError::InvalidArgument)?,
            None => self.config.traversal_order,
        };
        let start = resolve(&root, from)?;
        let ids: Vec<String> = start.traverse(order)?.map(|node| node.id().to_string()).collect();
        Ok(ids.join("\n"))
    }

    fn handle_validate(&self, file: &Path) -> Result<String, ApiError> {
        let content = std::fs::read_to_string(file)?;
        let data: SerializedTree<Value> = serde_json::from_str(&content)?;
        let root = Tree::from_serialized(data)?;
        Ok(format!("valid: {} node(s)", root.tree().len()))
    }

    fn handle_add(
        &self,
        file: &Path,
        id: &str,
        parent: Option<&str>,
        index: Option<usize>,
        data: Option<&str>,
    ) -> Result<String, ApiError> {
        let payload = data
            .map(|raw| {
                serde_json::from_str::<Value>(raw)
                    .map_err(|e| ApiError::InvalidArgument(format!("Invalid JSON payload: {}", e)))
            })
            .transpose()?;

        let root = self.load_tree(file)?;
        let parent = resolve(&root, parent)?;
        let node = parent.create_child(id, index)?;
        if let Some(payload) = payload {
            node.set_data(payload)?;
        }
        self.save_tree(file, &root)?;
        describe_position("added", &node)
    }

    fn handle_move(
        &self,
        file: &Path,
        id: &str,
        target: MoveTarget<'_>,
    ) -> Result<String, ApiError> {
        let root = self.load_tree(file)?;
        let node = resolve(&root, Some(id))?;
        match target {
            MoveTarget::Before(anchor) => node.move_before(&resolve(&root, Some(anchor))?)?,
            MoveTarget::After(anchor) => node.move_after(&resolve(&root, Some(anchor))?)?,
            MoveTarget::Under(parent, index) => node.move_to(&resolve(&root, parent)?, index)?,
        }
        self.save_tree(file, &root)?;
        describe_position("moved", &node)
    }

    fn handle_delete(
        &self,
        file: &Path,
        id: &str,
        strategy: Option<&str>,
    ) -> Result<String, ApiError> {
        let strategy = match strategy {
            Some(strategy) => strategy
                .parse::<DeleteStrategy>()
                .map_err(ApiError::InvalidArgument)?,
            None => self.config.delete_strategy,
        };
        let root = self.load_tree(file)?;
        let before = root.tree().len();
        resolve(&root, Some(id))?.delete(strategy)?;
        self.save_tree(file, &root)?;
        Ok(format!(
            "deleted {} ({:?}): {} node(s) removed",
            id,
            strategy,
            before - root.tree().len()
        ))
    }
}

enum MoveTarget<'a> {
    Before(&'a str),
    After(&'a str),
    Under(Option<&'a str>, Option<usize>),
}

/// Resolve an optional id against the whole tree; `None` is the root.
fn resolve(root: &Node<Value>, id: Option<&str>) -> Result<Node<Value>, ApiError> {
    let id = id.map_or(NodeId::Root, NodeId::from);
    root.get_node(&id)
        .ok_or_else(|| ApiError::Tree(crate::error::TreeError::UnknownNode(id)))
}

fn describe_position(verb: &str, node: &Node<Value>) -> Result<String, ApiError> {
    let parent = node
        .parent()?
        .map(|parent| parent.id().to_string())
        .unwrap_or_default();
    let index = node.index()?.unwrap_or_default();
    Ok(format!("{} {} under {} at index {}", verb, node.id(), parent, index))
}

/// Indented outline of every node below the root, one per line
pub fn format_outline(root: &Node<Value>) -> Result<String, ApiError> {
    let mut lines = Vec::new();
    for node in root.descendants(TraversalOrder::DepthFirst)? {
        let indent = "  ".repeat(node.depth()?.saturating_sub(1));
        match node.get_data()? {
            Some(data) => lines.push(format!("{}- {}: {}", indent, node.id(), data)),
            None => lines.push(format!("{}- {}", indent, node.id())),
        }
    }
    if lines.is_empty() {
        return Ok("(empty tree)".to_string());
    }
    Ok(lines.join("\n"))
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Show { .. } => "show",
        Commands::Traverse { .. } => "traverse",
        Commands::Validate { .. } => "validate",
        Commands::Add { .. } => "add",
        Commands::Move { .. } => "move",
        Commands::Delete { .. } => "delete",
    }
}
