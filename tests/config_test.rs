//! Tests for layered settings loading

use std::fs;

use flattree::cli::CliError;
use flattree::config::{local_config_path, RenderConfig, Settings};
use flattree::util::testing;
use serial_test::serial;
use tempfile::TempDir;

fn write_local(dir: &TempDir, content: &str) {
    fs::write(local_config_path(dir.path()), content).unwrap();
}

#[test]
#[serial]
fn given_no_local_file_when_loading_then_defaults_apply() {
    // Arrange
    testing::init_test_setup();
    let dir = TempDir::new().unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).unwrap();

    // Assert
    assert!(settings.render.show_side);
    assert_eq!(settings.render.label, None);
}

#[test]
#[serial]
fn given_local_file_when_loading_then_its_values_override_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    write_local(
        &dir,
        r#"
pretty = false

[render]
show_side = false
label = "name"
"#,
    );

    // Act
    let settings = Settings::load(Some(dir.path())).unwrap();

    // Assert
    assert!(!settings.pretty);
    assert!(!settings.render.show_side);
    assert_eq!(settings.render.label.as_deref(), Some("name"));
}

#[test]
#[serial]
fn given_malformed_local_file_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    write_local(&dir, "pretty = [not toml");

    let result = Settings::load(Some(dir.path()));

    assert!(matches!(result, Err(CliError::Config { .. })));
}

#[test]
#[serial]
fn given_env_override_when_loading_then_mark_fork_follows_env() {
    // Arrange
    let dir = TempDir::new().unwrap();
    write_local(&dir, "[render]\nmark_fork = true\n");
    std::env::set_var("FLATTREE_RENDER__MARK_FORK", "false");

    // Act
    let settings = Settings::load(Some(dir.path()));
    std::env::remove_var("FLATTREE_RENDER__MARK_FORK");

    // Assert
    assert!(!settings.unwrap().render.mark_fork);
}

#[test]
#[serial]
fn given_env_override_when_loading_then_env_wins_over_local_file() {
    // Arrange
    let dir = TempDir::new().unwrap();
    write_local(&dir, "pretty = true\n\n[render]\nshow_side = true\nlabel = \"name\"\n");
    std::env::set_var("FLATTREE_PRETTY", "false");
    std::env::set_var("FLATTREE_RENDER__SHOW_SIDE", "false");

    // Act
    let settings = Settings::load(Some(dir.path()));
    std::env::remove_var("FLATTREE_PRETTY");
    std::env::remove_var("FLATTREE_RENDER__SHOW_SIDE");

    // Assert
    let settings = settings.unwrap();
    assert!(!settings.pretty);
    assert!(!settings.render.show_side);
    assert_eq!(settings.render.label.as_deref(), Some("name"));
}

#[test]
fn given_settings_when_rendering_toml_then_sections_are_present() {
    let settings = Settings {
        pretty: false,
        render: RenderConfig {
            label: Some("title".into()),
            ..Default::default()
        },
    };

    let rendered = settings.to_toml().unwrap();

    assert!(rendered.contains("pretty = false"));
    assert!(rendered.contains("[render]"));
    assert!(rendered.contains("label = \"title\""));
}
