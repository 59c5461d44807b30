//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/flattree/flattree.toml`
//! 3. Local config: `<dir>/.flattree.toml` (working directory unless given)
//! 4. Environment variables: `FLATTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::cli::error::{CliError, CliResult};

/// How trees are drawn by `show`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Prefix children with `L`/`R` for the slot they occupy
    pub show_side: bool,
    /// Append `*` to fork nodes
    pub mark_fork: bool,
    /// Payload field printed after the id, if present on the node
    pub label: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_side: true,
            mark_fork: true,
            label: None,
        }
    }
}

/// Raw render config for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderConfig {
    pub show_side: Option<bool>,
    pub mark_fork: Option<bool>,
    pub label: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub pretty: Option<bool>,
    pub render: RawRenderConfig,
}

impl RenderConfig {
    /// Overlay wins where it says something, base is kept otherwise.
    pub fn merge(&self, overlay: &RawRenderConfig) -> Self {
        Self {
            show_side: overlay.show_side.unwrap_or(self.show_side),
            mark_fork: overlay.mark_fork.unwrap_or(self.mark_fork),
            label: overlay.label.clone().or_else(|| self.label.clone()),
        }
    }
}

/// Unified configuration for flattree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Pretty-print JSON records written by edit commands
    pub pretty: bool,
    /// Tree drawing options
    pub render: RenderConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pretty: true,
            render: RenderConfig::default(),
        }
    }
}

/// Get the XDG config directory for flattree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "flattree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("flattree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".flattree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> CliResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| CliError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: config::ConfigError) -> CliError {
    CliError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            pretty: overlay.pretty.unwrap_or(self.pretty),
            render: self.render.merge(&overlay.render),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Directory searched for `.flattree.toml` (default: cwd)
    #[instrument(level = "debug")]
    pub fn load(local_dir: Option<&Path>) -> CliResult<Self> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Local config
        let local_path = local_config_path(local_dir.unwrap_or_else(|| Path::new(".")));
        if local_path.exists() {
            debug!("local config: {}", local_path.display());
            current = current.merge_with(&load_raw_settings(&local_path)?);
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply FLATTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> CliResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("FLATTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_bool("pretty") {
            settings.pretty = val;
        }
        if let Ok(val) = config.get_bool("render.show_side") {
            settings.render.show_side = val;
        }
        if let Ok(val) = config.get_bool("render.mark_fork") {
            settings.render.mark_fork = val;
        }
        if let Ok(val) = config.get_string("render.label") {
            settings.render.label = Some(val);
        }

        Ok(settings)
    }

    /// Render settings as TOML (for display).
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config {
            message: format!("serialize: {}", e),
        })
    }
}
