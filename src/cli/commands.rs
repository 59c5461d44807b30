//! Command dispatch: read records, run one tree operation, write records back

use std::fs;
use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, WriteArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{validate, FlatRecord, NodeData, Side, Tree, TreeError, TreeResult};
use crate::render::TreeRender;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };
    let settings = Settings::load(cli.config_dir.as_deref())?;
    debug!(?settings, "settings loaded");

    match command {
        Commands::Validate { file } => validate_file(file),
        Commands::Show { file } => show(file, &settings),
        Commands::Info { file } => info(file),
        Commands::Insert {
            file,
            parent,
            id,
            side,
            fork,
            data,
            write,
        } => {
            let data = parse_data(data.as_deref(), *fork)?;
            edit(file, &settings, write, |tree| {
                tree.insert(parent, id.clone(), side.side(), data)
            })
        }
        Commands::Remove {
            file,
            id,
            keep_left,
            keep_right,
            write,
        } => {
            let keep = keep_side(*keep_left, *keep_right);
            edit(file, &settings, write, |tree| tree.remove_node(id, keep))
        }
        Commands::Prune { file, id, write } => {
            edit(file, &settings, write, |tree| tree.remove_subtree(id))
        }
        Commands::Swap { file, id, write } => {
            edit(file, &settings, write, |tree| tree.swap_children(id))
        }
        Commands::MoveNode {
            file,
            target,
            source,
            side,
            write,
        } => edit(file, &settings, write, |tree| {
            tree.move_node(target, source, side.side())
        }),
        Commands::MoveSubtree {
            file,
            target,
            source,
            side,
            write,
        } => edit(file, &settings, write, |tree| {
            tree.move_subtree(target, source, side.side())
        }),
        Commands::Config => {
            output::plain(&settings.to_toml()?);
            Ok(())
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Read a JSON array of flat records.
#[instrument(level = "debug")]
pub fn read_records(path: &Path) -> CliResult<Vec<FlatRecord>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("read {}", path.display()), e))?;
    serde_json::from_str(&content).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write records as a JSON array, replacing the file.
#[instrument(level = "debug", skip(records))]
pub fn write_records(path: &Path, records: &[FlatRecord], pretty: bool) -> CliResult<()> {
    let json = to_json(path, records, pretty)?;
    fs::write(path, format!("{}\n", json))
        .map_err(|e| CliError::io(format!("write {}", path.display()), e))
}

fn to_json(path: &Path, records: &[FlatRecord], pretty: bool) -> CliResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(records)
    } else {
        serde_json::to_string(records)
    };
    json.map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Payload for a new node from `--data` and `--fork`.
fn parse_data(raw: Option<&str>, fork: bool) -> CliResult<NodeData> {
    let mut data = match raw {
        Some(raw) => serde_json::from_str::<NodeData>(raw)
            .map_err(|e| CliError::InvalidArgs(format!("--data: {}", e)))?,
        None => NodeData::default(),
    };
    if fork {
        data.fork = Some(true);
    }
    Ok(data)
}

fn keep_side(keep_left: bool, keep_right: bool) -> Option<Side> {
    match (keep_left, keep_right) {
        (true, _) => Some(Side::Left),
        (_, true) => Some(Side::Right),
        _ => None,
    }
}

/// Load, apply `op`, and write the packed result (or print it on dry run).
#[instrument(level = "debug", skip(settings, op))]
fn edit(
    file: &Path,
    settings: &Settings,
    write: &WriteArgs,
    op: impl FnOnce(&Tree) -> TreeResult<Tree>,
) -> CliResult<()> {
    let tree = Tree::load(&read_records(file)?)?;
    let next = op(&tree)?;
    let records = next.pack();

    if write.dry_run {
        output::plain(&to_json(file, &records, settings.pretty)?);
    } else {
        write_records(file, &records, settings.pretty)?;
        output::success(&format!("{}: {} nodes", file.display(), next.len()));
    }
    Ok(())
}

#[instrument(level = "debug")]
fn validate_file(file: &Path) -> CliResult<()> {
    let records = read_records(file)?;
    validate(&records).map_err(TreeError::from)?;
    output::success(&format!("{}: {} records, valid", file.display(), records.len()));
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn show(file: &Path, settings: &Settings) -> CliResult<()> {
    let tree = Tree::load(&read_records(file)?)?;
    output::plain(&tree.to_tree_string(&settings.render));
    Ok(())
}

#[instrument(level = "debug")]
fn info(file: &Path) -> CliResult<()> {
    let tree = Tree::load(&read_records(file)?)?;
    output::header(&file.display());
    output::field("nodes", &tree.len());
    output::field("root", tree.root());
    output::field("depth", &tree.depth());
    output::field("leaves", &tree.leaves().iter().join(", "));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_sets_fork_and_fields() {
        let data = parse_data(Some(r#"{"name": "x"}"#), true).unwrap();
        assert!(data.is_fork());
        assert_eq!(data.fields.get("name"), Some(&serde_json::json!("x")));
    }

    #[test]
    fn test_parse_data_rejects_non_object() {
        let err = parse_data(Some("[1, 2]"), false).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgs(_)));
    }

    #[test]
    fn test_keep_side() {
        assert_eq!(keep_side(false, false), None);
        assert_eq!(keep_side(true, false), Some(Side::Left));
        assert_eq!(keep_side(false, true), Some(Side::Right));
    }
}
