//! Explorer preference loading: TOML file plus defaults.
//!
//! The engine itself only ever consumes [`BuildOptions`]; this module is
//! the settings-collaborator side of that boundary, turning a persisted
//! preference file into options. Resolution order (first found wins):
//! 1. `$XTREE_CONFIG` environment variable (path to config file)
//! 2. Project-local `.xtree.toml` in the current working directory
//! 3. Global `~/.config/xtree/config.toml`
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::options::{BuildOptions, SortMode};

/// Tree projection preferences.
///
/// All fields optional so a partial file still merges over defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TreePrefs {
    /// Sort order: "name", "size", "date".
    pub sort_by: Option<String>,
    /// Directories always listed first.
    pub folders_on_top: Option<bool>,
    /// Show hidden files.
    pub show_hidden: Option<bool>,
    /// Collapse singleton directory chains into one row.
    pub compact_packages: Option<bool>,
}

/// Top-level preference file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ExplorerConfig {
    pub tree: TreePrefs,
}

impl ExplorerConfig {
    /// Projection options seeded from these preferences.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            sort_mode: self
                .tree
                .sort_by
                .as_deref()
                .map(SortMode::from_config)
                .unwrap_or_default(),
            folders_on_top: self.tree.folders_on_top.unwrap_or(true),
            show_hidden: self.tree.show_hidden.unwrap_or(false),
            compact_packages: self.tree.compact_packages.unwrap_or(false),
            ..BuildOptions::default()
        }
    }
}

/// Candidate config file paths in priority order.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(env_path) = std::env::var("XTREE_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".xtree.toml"));
    }
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("xtree").join("config.toml"));
    }
    paths
}

/// Read and parse one TOML file; `None` if missing or malformed.
fn load_file(path: &Path) -> Option<ExplorerConfig> {
    let text = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&text) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring malformed config");
            None
        }
    }
}

/// Load the first config file found, or defaults.
pub fn load() -> ExplorerConfig {
    candidate_paths()
        .iter()
        .find_map(|p| load_file(p))
        .unwrap_or_default()
}
