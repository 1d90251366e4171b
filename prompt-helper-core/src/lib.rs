//! # prompt-helper-core - Runtime for prompt-helper
//!
//! `prompt-helper-core` holds the logic behind the prompt-helper nodes of a
//! node-based image generation workflow. The host application owns the node
//! graph; this crate owns the data transformations those nodes perform.
//!
//! ## Highlights
//!
//! - **Preset Store**: flattens `.csv`, `.yml`/`.yaml` and `.json` preset
//!   files from a directory tree into one ordered, keyed mapping and caches it
//!   behind an atomically swapped snapshot.
//! - **Weighted Prompt Composer**: renders `(text:weight)` fragments joined in
//!   order, dropping zero-weight and empty fragments.
//! - **Text helpers**: whitespace/comma normalization, joining, `[n]` pattern
//!   formatting.
//! - **Image directory listing**: the file-level half of the directory image
//!   nodes (enumeration, sorting, output naming).
//! - **Configuration-First**: defaults are read from `prompt-helper.toml`.
//!
//! ## Quickstart
//!
//! ```rust,ignore
//! use prompt_helper_core::compose::{WeightedFragment, compose};
//! use prompt_helper_core::preset::{LoadOptions, PresetStore};
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = PresetStore::new("presets", LoadOptions::default());
//!     let style = store.get_text("styles: watercolor")?;
//!
//!     let prompt = compose(
//!         &[
//!             WeightedFragment::new(style, 1.0),
//!             WeightedFragment::new("a cat on a windowsill", 1.2),
//!         ],
//!         1.0,
//!     );
//!     println!("{prompt}");
//!     Ok(())
//! }
//! ```

pub mod compose;
pub mod config;
pub mod images;
pub mod preset;
pub mod text;

pub use compose::{WeightedFragment, compose};
pub use config::{ConfigManager, PromptHelperConfig};
pub use preset::{
    AdapterRef, ErrorPolicy, LoadOptions, PresetEntry, PresetError, PresetKind, PresetSnapshot,
    PresetStore, StructuredPreset,
};
pub use text::normalize;
