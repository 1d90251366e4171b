//! Structured presets: prompts plus a stack of LoRA adapter references.

use super::{NO_ADAPTER, PresetEntry, PresetError, preset_key};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named adapter overlay with model and clip strengths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdapterRef {
    pub name: String,
    /// Strength applied to the diffusion model.
    pub strength_primary: f64,
    /// Strength applied to the text encoder.
    pub strength_secondary: f64,
}

impl AdapterRef {
    pub fn new(name: impl Into<String>, strength_primary: f64, strength_secondary: f64) -> Self {
        Self {
            name: name.into(),
            strength_primary,
            strength_secondary,
        }
    }

    /// The sentinel used when no adapter is given.
    pub fn none() -> Self {
        Self::new(NO_ADAPTER, 0.0, 0.0)
    }

    pub fn is_none(&self) -> bool {
        self.name == NO_ADAPTER
    }
}

impl Default for AdapterRef {
    fn default() -> Self {
        Self::none()
    }
}

/// Adapter object as written in preset files.
///
/// A single `weight` applies to both stages; otherwise `strength_model` and
/// `strength_clip` are read separately.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAdapter {
    #[serde(default)]
    pub lora_name: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub strength_model: Option<f64>,
    #[serde(default)]
    pub strength_clip: Option<f64>,
}

impl RawAdapter {
    pub fn resolve(&self) -> AdapterRef {
        let name = self.lora_name.clone().unwrap_or_else(|| NO_ADAPTER.to_string());
        match self.weight {
            Some(weight) => AdapterRef::new(name, weight, weight),
            None => AdapterRef::new(
                name,
                self.strength_model.unwrap_or(0.0),
                self.strength_clip.unwrap_or(0.0),
            ),
        }
    }
}

/// Resolve an optional adapter object, falling back to the `"None"` sentinel.
pub fn resolve_adapter(raw: Option<&RawAdapter>) -> AdapterRef {
    raw.map(RawAdapter::resolve).unwrap_or_default()
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawStructuredPreset {
    #[serde(default)]
    positive_prompt: String,
    #[serde(default)]
    negative_prompt: String,
    #[serde(default)]
    lora: Option<RawAdapter>,
    #[serde(default)]
    loras: Option<Vec<RawAdapter>>,
}

/// Prompts and adapters of one JSON preset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredPreset {
    pub positive_prompt: String,
    pub negative_prompt: String,
    /// The single `lora` object of the preset, or the sentinel.
    pub primary: AdapterRef,
    /// Ordered adapter stack.
    pub adapters: Vec<AdapterRef>,
}

impl StructuredPreset {
    fn from_raw(raw: RawStructuredPreset) -> Self {
        let primary = resolve_adapter(raw.lora.as_ref());
        let adapters = match (raw.loras, raw.lora.is_some()) {
            (None, true) => vec![primary.clone()],
            (loras, _) => loras
                .unwrap_or_default()
                .iter()
                .map(RawAdapter::resolve)
                .collect(),
        };
        Self {
            positive_prompt: raw.positive_prompt,
            negative_prompt: raw.negative_prompt,
            primary,
            adapters,
        }
    }

    /// Parse one preset object.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value).map(Self::from_raw)
    }

    /// Node outputs: positive, negative, primary adapter name, model strength,
    /// clip strength, adapter stack.
    pub fn outputs(&self) -> (&str, &str, &str, f64, f64, &[AdapterRef]) {
        (
            &self.positive_prompt,
            &self.negative_prompt,
            &self.primary.name,
            self.primary.strength_primary,
            self.primary.strength_secondary,
            &self.adapters,
        )
    }
}

/// Flatten a JSON document whose top-level keys are preset names.
pub fn flatten_json(
    stem: &str,
    content: &str,
    path: &Path,
) -> Result<Vec<(String, PresetEntry)>, PresetError> {
    let document: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(content).map_err(|e| PresetError::parse(path, e.to_string()))?;

    document
        .into_iter()
        .map(|(name, value)| {
            let preset = StructuredPreset::from_json(value)
                .map_err(|e| PresetError::parse(path, format!("preset '{name}': {e}")))?;
            Ok((preset_key(stem, &name), PresetEntry::Structured(preset)))
        })
        .collect()
}
