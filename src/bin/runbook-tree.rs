//! Runbook Tree CLI Binary
//!
//! Command-line interface for inspecting and editing serialized runbook trees.

use anyhow::Context;
use clap::Parser;
use runbook_tree::logging::init_logging;
use runbook_tree::tooling::cli::{Cli, CliContext};
use std::process;

fn run() -> anyhow::Result<String> {
    let cli = Cli::parse();

    let context =
        CliContext::new(cli.config.clone()).context("Error initializing configuration")?;

    let logging = cli.logging_config(&context.config().logging);
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let output = context.execute(&cli.command)?;
    Ok(output)
}

fn main() {
    match run() {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
