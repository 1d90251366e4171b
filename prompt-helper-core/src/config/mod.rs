//! prompt-helper Configuration Module
//!
//! Loads `prompt-helper.toml` and exposes the preset and image listing
//! defaults used by the CLI and by embedding hosts.

pub mod constants;
pub mod loader;

pub use loader::{ConfigManager, PromptHelperConfig};

use crate::images::{DEFAULT_IMAGE_EXTENSIONS, ListOptions, SortMethod};
use crate::preset::{ErrorPolicy, LoadOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Preset directory settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PresetsConfig {
    /// Preset directory (relative paths resolve against the workspace, `~` expands)
    #[serde(default = "default_presets_dir")]
    pub dir: String,

    /// Behavior when a single preset file is malformed (`abort` or `skip`)
    #[serde(default)]
    pub on_error: ErrorPolicy,
}

impl Default for PresetsConfig {
    fn default() -> Self {
        Self {
            dir: default_presets_dir(),
            on_error: ErrorPolicy::default(),
        }
    }
}

impl PresetsConfig {
    pub fn resolve_dir(&self, workspace_root: Option<&Path>) -> PathBuf {
        resolve_path(&self.dir, workspace_root)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::with_policy(self.on_error)
    }
}

/// Image directory listing settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImagesConfig {
    /// Extensions treated as images
    #[serde(default = "default_image_extensions")]
    pub extensions: Vec<String>,

    /// Default sort method
    #[serde(default)]
    pub sort: SortMethod,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            extensions: default_image_extensions(),
            sort: SortMethod::default(),
        }
    }
}

impl ImagesConfig {
    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            sort: self.sort,
            extensions: self.extensions.clone(),
            ..ListOptions::default()
        }
    }
}

fn default_presets_dir() -> String {
    constants::defaults::PRESETS_DIR.to_string()
}

fn default_image_extensions() -> Vec<String> {
    DEFAULT_IMAGE_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

/// Expand `~` and resolve relative paths against `workspace_root` when given.
pub fn resolve_path(input: &str, workspace_root: Option<&Path>) -> PathBuf {
    let trimmed = input.trim();
    if let Some(rest) = trimmed.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            let rest = rest.trim_start_matches(['/', '\\']);
            return if rest.is_empty() { home } else { home.join(rest) };
        }
    }

    let candidate = PathBuf::from(trimmed);
    match workspace_root {
        Some(root) if candidate.is_relative() => root.join(candidate),
        _ => candidate,
    }
}
