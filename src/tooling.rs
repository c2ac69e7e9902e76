//! Tooling & Integration Layer
//!
//! Command-line access to serialized trees, so documents persisted by the
//! surrounding application can be inspected and repaired outside of it.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
