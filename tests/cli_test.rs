//! End-to-end tests driving parsed command lines against record files

mod common;

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use flattree::cli::commands::{read_records, write_records};
use flattree::cli::{execute_command, Cli, CliError};
use flattree::exitcode;
use flattree::{Tree, TreeError, ValidationError};
use tempfile::TempDir;

use common::{links, n, sample_records};

struct Workspace {
    dir: TempDir,
    file: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("tree.json");
        write_records(&file, &sample_records(), true).unwrap();
        Self { dir, file }
    }

    /// Runs `flattree -C <tempdir> <args..>`, with the file path substituted for `FILE`.
    fn run(&self, args: &[&str]) -> Result<(), CliError> {
        let file = self.file.to_string_lossy().to_string();
        let dir = self.dir.path().to_string_lossy().to_string();
        let mut argv = vec!["flattree".to_string(), "-C".to_string(), dir];
        argv.extend(
            args.iter()
                .map(|a| if *a == "FILE" { file.clone() } else { a.to_string() }),
        );
        let cli = Cli::try_parse_from(argv).unwrap();
        execute_command(&cli)
    }

    fn tree(&self) -> Tree {
        Tree::load(&read_records(&self.file).unwrap()).unwrap()
    }
}

fn contents(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn given_valid_file_when_running_read_commands_then_succeeds() {
    let ws = Workspace::new();

    assert!(ws.run(&["validate", "FILE"]).is_ok());
    assert!(ws.run(&["show", "FILE"]).is_ok());
    assert!(ws.run(&["info", "FILE"]).is_ok());
    assert!(ws.run(&["config"]).is_ok());
}

#[test]
fn given_insert_command_when_executed_then_file_is_rewritten() {
    // Arrange
    let ws = Workspace::new();

    // Act
    ws.run(&["insert", "FILE", "107", "1000", "--right", "--data", r#"{"name": "x"}"#])
        .unwrap();

    // Assert
    let tree = ws.tree();
    assert_eq!(links(&tree, 107).2, Some(n(1000)));
    let node = tree.get(&n(1000)).unwrap();
    assert_eq!(node.data.fields.get("name"), Some(&serde_json::json!("x")));
}

#[test]
fn given_dry_run_when_editing_then_file_is_unchanged() {
    // Arrange
    let ws = Workspace::new();
    let before = contents(&ws.file);

    // Act
    ws.run(&["prune", "FILE", "101", "--dry-run"]).unwrap();

    // Assert
    assert_eq!(contents(&ws.file), before);
}

#[test]
fn given_edit_sequence_when_executed_then_each_step_persists() {
    let ws = Workspace::new();

    ws.run(&["remove", "FILE", "101", "--keep-right"]).unwrap();
    ws.run(&["move-subtree", "FILE", "107", "105"]).unwrap_err();
    ws.run(&["move-node", "FILE", "104", "106"]).unwrap();
    ws.run(&["swap", "FILE", "100"]).unwrap();

    let tree = ws.tree();
    assert_eq!(links(&tree, 100), (None, Some(n(102)), Some(n(104))));
    assert_eq!(links(&tree, 104).1, Some(n(106)));
    assert_eq!(links(&tree, 105).1, Some(n(107)));
    assert_eq!(tree.check_invariants(), Ok(()));
}

#[test]
fn given_failing_edit_when_executed_then_file_is_untouched_and_exit_is_dataerr() {
    // Arrange
    let ws = Workspace::new();
    let before = contents(&ws.file);

    // Act
    let err = ws.run(&["insert", "FILE", "102", "1000", "--right"]).unwrap_err();

    // Assert
    assert!(matches!(err, CliError::Tree(TreeError::SideNotAllowed(_))));
    assert_eq!(err.exit_code(), exitcode::DATAERR);
    assert_eq!(contents(&ws.file), before);
}

#[test]
fn given_invalid_records_when_validating_then_reports_rule_with_dataerr() {
    // Arrange
    let ws = Workspace::new();
    fs::write(&ws.file, r#"[{"id": 1}, {"id": 2}]"#).unwrap();

    // Act
    let err = ws.run(&["validate", "FILE"]).unwrap_err();

    // Assert
    assert!(matches!(
        err,
        CliError::Tree(TreeError::Invalid(ValidationError::MultipleRoots(_, _)))
    ));
    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_malformed_json_when_loading_then_json_error() {
    let ws = Workspace::new();
    fs::write(&ws.file, "{not json").unwrap();

    let err = ws.run(&["show", "FILE"]).unwrap_err();

    assert!(matches!(err, CliError::Json { .. }));
    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_missing_file_when_loading_then_noinput() {
    let ws = Workspace::new();
    fs::remove_file(&ws.file).unwrap();

    let err = ws.run(&["info", "FILE"]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_bad_payload_when_inserting_then_usage_error() {
    let ws = Workspace::new();

    let err = ws
        .run(&["insert", "FILE", "107", "1000", "--data", "[1]"])
        .unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_compact_setting_when_writing_then_single_line_output() {
    // Arrange
    let ws = Workspace::new();
    fs::write(ws.dir.path().join(".flattree.toml"), "pretty = false\n").unwrap();

    // Act
    ws.run(&["swap", "FILE", "101"]).unwrap();

    // Assert
    assert_eq!(contents(&ws.file).trim_end().lines().count(), 1);
    assert_eq!(links(&ws.tree(), 101).1, Some(n(104)));
}

#[test]
fn given_numeric_id_argument_when_pruning_then_matches_numeric_record() {
    // Arrange
    let ws = Workspace::new();

    // Act
    ws.run(&["prune", "FILE", "101"]).unwrap();

    // Assert
    let tree = ws.tree();
    assert!(tree.get(&n(101)).is_none());
    assert_eq!(tree.len(), 5);
}
