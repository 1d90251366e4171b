use super::constants::defaults;
use super::{ImagesConfig, PresetsConfig};
use crate::preset::PresetStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure for prompt-helper
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PromptHelperConfig {
    /// Preset directory settings
    #[serde(default)]
    pub presets: PresetsConfig,

    /// Image directory listing settings
    #[serde(default)]
    pub images: ImagesConfig,
}

impl PromptHelperConfig {
    /// Write the default configuration to `output`
    pub fn create_sample_config<P: AsRef<Path>>(output: P) -> Result<()> {
        let output = output.as_ref();
        let config_content = toml::to_string_pretty(&PromptHelperConfig::default())
            .context("Failed to serialize default configuration")?;

        fs::write(output, config_content)
            .with_context(|| format!("Failed to write config file: {}", output.display()))?;

        Ok(())
    }
}

/// Configuration manager for locating and loading `prompt-helper.toml`
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: PromptHelperConfig,
    config_path: Option<PathBuf>,
    workspace: PathBuf,
}

impl ConfigManager {
    /// Load configuration for the current directory
    pub fn load() -> Result<Self> {
        Self::load_from_workspace(std::env::current_dir()?)
    }

    /// Load configuration from a workspace.
    ///
    /// Search order: `<workspace>/prompt-helper.toml`,
    /// `<workspace>/.prompt-helper/prompt-helper.toml`,
    /// `~/.prompt-helper/prompt-helper.toml`, then built-in defaults.
    pub fn load_from_workspace(workspace: impl AsRef<Path>) -> Result<Self> {
        let workspace = workspace.as_ref();

        let mut candidates = vec![
            workspace.join(defaults::CONFIG_FILE_NAME),
            workspace.join(defaults::DOT_DIR).join(defaults::CONFIG_FILE_NAME),
        ];
        if let Some(home_dir) = dirs::home_dir() {
            candidates.push(home_dir.join(defaults::DOT_DIR).join(defaults::CONFIG_FILE_NAME));
        }

        for candidate in candidates {
            if candidate.is_file() {
                let mut manager = Self::load_from_file(&candidate)?;
                manager.workspace = workspace.to_path_buf();
                return Ok(manager);
            }
        }

        debug!(workspace = %workspace.display(), "no config file found, using defaults");
        Ok(Self {
            config: PromptHelperConfig::default(),
            config_path: None,
            workspace: workspace.to_path_buf(),
        })
    }

    /// Load configuration from a specific file.
    ///
    /// The workspace is the directory containing the file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: PromptHelperConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), "loaded config file");
        let workspace = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
            workspace,
        })
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &PromptHelperConfig {
        &self.config
    }

    /// Get the configuration file path (if loaded from file)
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Absolute preset directory for this workspace
    pub fn presets_dir(&self) -> PathBuf {
        self.config.presets.resolve_dir(Some(&self.workspace))
    }

    /// Build a preset store over the configured directory
    pub fn preset_store(&self) -> PresetStore {
        PresetStore::new(self.presets_dir(), self.config.presets.load_options())
    }
}
