use clap::Parser;
use runbook_tree::config::TreeConfig;
use runbook_tree::tooling::{Cli, CliContext, Commands};
use runbook_tree::{ApiError, DeleteStrategy, SerializedTree, Tree, TreeError};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::support::sample_tree;

fn write_sample(dir: &TempDir) -> PathBuf {
    let root = sample_tree();
    let flat = root.tree().to_serialized();
    let path = dir.path().join("doc.json");
    std::fs::write(&path, serde_json::to_string_pretty(&flat).unwrap()).unwrap();
    path
}

fn read_tree(path: &Path) -> SerializedTree<Value> {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn context() -> CliContext {
    CliContext::with_config(TreeConfig::default())
}

#[test]
fn show_renders_outline_and_json() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(&dir);

    let outline = context()
        .execute(&Commands::Show {
            file: file.clone(),
            format: "text".to_string(),
        })
        .unwrap();
    assert_eq!(
        outline,
        "- child1: 1\n  - child3: 3\n  - child4: 4\n- child2: 2"
    );

    let json = context()
        .execute(&Commands::Show {
            file,
            format: "json".to_string(),
        })
        .unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["children"][0]["children"][1]["data"], 4);
}

#[test]
fn traverse_uses_requested_or_configured_order() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(&dir);

    let dfs = context()
        .execute(&Commands::Traverse {
            file: file.clone(),
            order: None,
            from: None,
        })
        .unwrap();
    assert_eq!(dfs, "<root>\nchild1\nchild3\nchild4\nchild2");

    let bfs = context()
        .execute(&Commands::Traverse {
            file,
            order: Some("bfs".to_string()),
            from: Some("child1".to_string()),
        })
        .unwrap();
    assert_eq!(bfs, "child1\nchild3\nchild4");
}

#[test]
fn add_move_and_delete_rewrite_the_file() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(&dir);
    let ctx = context();

    ctx.execute(&Commands::Add {
        file: file.clone(),
        id: "child5".to_string(),
        parent: Some("child2".to_string()),
        index: None,
        data: Some(r#"{"title": "Five"}"#.to_string()),
    })
    .unwrap();
    let flat = read_tree(&file);
    assert_eq!(flat["child5"].parent.as_deref(), Some("child2"));
    assert_eq!(flat["child5"].data, Some(serde_json::json!({"title": "Five"})));

    let moved = ctx
        .execute(&Commands::Move {
            file: file.clone(),
            id: "child5".to_string(),
            parent: None,
            index: None,
            before: Some("child1".to_string()),
            after: None,
        })
        .unwrap();
    assert_eq!(moved, "moved child5 under <root> at index 0");

    ctx.execute(&Commands::Delete {
        file: file.clone(),
        id: "child1".to_string(),
        strategy: Some("reattach".to_string()),
    })
    .unwrap();
    let root = Tree::from_serialized(read_tree(&file)).unwrap();
    let order: Vec<String> = root
        .children()
        .unwrap()
        .iter()
        .map(|n| n.id().to_string())
        .collect();
    assert_eq!(order, vec!["child5", "child3", "child4", "child2"]);
}

#[test]
fn configured_delete_strategy_applies_when_flag_is_absent() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(&dir);
    let before = std::fs::read_to_string(&file).unwrap();

    let err = context()
        .execute(&Commands::Delete {
            file: file.clone(),
            id: "child1".to_string(),
            strategy: None,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Tree(TreeError::CascadeRefused(ref id)) if id == "child1"
    ));
    assert_eq!(std::fs::read_to_string(&file).unwrap(), before);

    let cascading = CliContext::with_config(TreeConfig {
        delete_strategy: DeleteStrategy::Cascade,
        ..TreeConfig::default()
    });
    let summary = cascading
        .execute(&Commands::Delete {
            file: file.clone(),
            id: "child1".to_string(),
            strategy: None,
        })
        .unwrap();
    assert!(summary.contains("3 node(s) removed"), "{}", summary);
    assert_eq!(read_tree(&file).len(), 1);
}

#[test]
fn validate_reports_broken_files() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(&dir);
    let ok = context()
        .execute(&Commands::Validate { file: file.clone() })
        .unwrap();
    assert_eq!(ok, "valid: 4 node(s)");

    let broken = dir.path().join("broken.json");
    std::fs::write(
        &broken,
        r#"{"a": {"id": "a", "data": null, "parent": "ghost", "index": 0}}"#,
    )
    .unwrap();
    let err = context()
        .execute(&Commands::Validate { file: broken })
        .unwrap_err();
    assert!(matches!(err, ApiError::Tree(TreeError::InvalidSerialized(_))));

    let missing = context()
        .execute(&Commands::Validate {
            file: dir.path().join("missing.json"),
        })
        .unwrap_err();
    assert!(matches!(missing, ApiError::Io(_)));
}

#[test]
fn invalid_arguments_are_reported() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(&dir);

    let err = context()
        .execute(&Commands::Traverse {
            file: file.clone(),
            order: Some("sideways".to_string()),
            from: None,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));

    let err = context()
        .execute(&Commands::Add {
            file,
            id: "x".to_string(),
            parent: None,
            index: None,
            data: Some("{not json".to_string()),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[test]
fn parses_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "runbook-tree",
        "delete",
        "doc.json",
        "child1",
        "--strategy",
        "cascade",
        "--log-format",
        "json",
    ])
    .unwrap();
    assert_eq!(cli.log_format.as_deref(), Some("json"));
    assert!(matches!(
        cli.command,
        Commands::Delete { ref strategy, .. } if strategy.as_deref() == Some("cascade")
    ));

    assert!(Cli::try_parse_from(["runbook-tree", "move", "doc.json"]).is_err());
}
