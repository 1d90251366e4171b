//! CLI argument parsing and configuration

use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use prompt_helper_core::compose::WeightedFragment;
use prompt_helper_core::images::SortMethod;
use prompt_helper_core::preset::PresetKind;
use std::path::PathBuf;

/// Main CLI structure for prompt-helper
#[derive(Parser, Debug)]
#[command(
    name = "prompt-helper",
    version,
    about = "Preset flattening and weighted prompt composition\n\nQuick Start:\n  prompt-helper presets list\n  prompt-helper compose \"a castle:1.2\" \"fog:0.8\""
)]
pub struct Cli {
    /// Workspace root used to locate prompt-helper.toml and relative preset paths
    ///
    /// Default: Current directory
    #[arg(long, global = true, value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub workspace: Option<PathBuf>,

    /// Explicit configuration file (skips the workspace/home search)
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Override the preset directory from the configuration
    #[arg(long, global = true, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub presets_dir: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect flattened presets
    #[command(subcommand)]
    Presets(PresetsCommand),

    /// Compose weighted fragments (`text:weight`) into one prompt
    Compose {
        /// Fragments in order; text without `:weight` has weight 1.0
        #[arg(value_name = "TEXT:WEIGHT", required = true)]
        fragments: Vec<WeightedFragment>,

        /// Multiplier applied to every fragment weight
        #[arg(long, short, default_value_t = 1.0)]
        multiplier: f64,
    },

    /// Normalize prompt text (whitespace and surrounding commas)
    Normalize {
        /// Text to normalize; multiple arguments are joined with spaces
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Join prompt parts with a separator, skipping empty parts
    Join {
        /// Separator placed between parts
        #[arg(long, short, default_value = ",")]
        sep: String,

        parts: Vec<String>,
    },

    /// Replace `[1]`, `[2]`, ... in a pattern with the given strings
    Format {
        pattern: String,
        args: Vec<String>,
    },

    /// List image files in a directory the way the batch loader would
    Images {
        #[arg(value_hint = ValueHint::DirPath)]
        directory: PathBuf,

        /// Sort method (e.g. text-asc, number-desc, "As Number (Asc)")
        #[arg(long)]
        sort: Option<SortMethod>,

        /// Number of files dropped after sorting
        #[arg(long, default_value_t = 0)]
        skips: usize,

        /// Report file stems instead of file names
        #[arg(long)]
        trim_suffix: bool,
    },

    /// Write a default prompt-helper.toml into the workspace
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum PresetsCommand {
    /// List preset keys in load order
    List {
        /// Only list presets of this kind
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Show one preset
    Show {
        key: String,

        /// Print the preset as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Simple,
    Structured,
}

impl From<KindArg> for PresetKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Simple => PresetKind::Simple,
            KindArg::Structured => PresetKind::Structured,
        }
    }
}
