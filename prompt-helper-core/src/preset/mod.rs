//! Preset loading and caching
//!
//! Presets live as `.csv`, `.yml`/`.yaml` and `.json` files under a preset
//! directory. Each file is flattened into `"<file stem>: <qualifier>"` keys
//! and merged into one ordered mapping held by [`PresetStore`].

mod error;
mod loader;
mod simple;
mod store;
mod structured;

pub use error::PresetError;
pub use loader::{ErrorPolicy, LoadOptions, PresetSnapshot, SkippedFile, load};
pub use simple::{Node, flatten_csv, flatten_yaml};
pub use store::PresetStore;
pub use structured::{AdapterRef, RawAdapter, StructuredPreset, flatten_json, resolve_adapter};

use serde::Serialize;
use std::fmt;

/// Sentinel adapter name used when no adapter is configured.
pub const NO_ADAPTER: &str = "None";

/// One flattened preset value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PresetEntry {
    /// Plain prompt text from a CSV row or YAML scalar.
    Simple { text: String },
    /// Prompts plus adapter stack from a JSON preset.
    Structured(StructuredPreset),
}

impl PresetEntry {
    pub fn simple(text: impl Into<String>) -> Self {
        Self::Simple { text: text.into() }
    }

    pub fn kind(&self) -> PresetKind {
        match self {
            Self::Simple { .. } => PresetKind::Simple,
            Self::Structured(_) => PresetKind::Structured,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Simple { text } => Some(text),
            Self::Structured(_) => None,
        }
    }

    pub fn as_structured(&self) -> Option<&StructuredPreset> {
        match self {
            Self::Structured(preset) => Some(preset),
            Self::Simple { .. } => None,
        }
    }
}

/// Variant discriminant of a [`PresetEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetKind {
    Simple,
    Structured,
}

impl fmt::Display for PresetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => f.write_str("simple"),
            Self::Structured => f.write_str("structured"),
        }
    }
}

/// Build the composite key `"<stem>: <qualifier>"`.
pub fn preset_key(stem: &str, qualifier: &str) -> String {
    format!("{stem}: {qualifier}")
}
