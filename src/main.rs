//! prompt-helper CLI
//!
//! Thin host around `prompt-helper-core`: loads `prompt-helper.toml`, builds
//! the preset store and runs one command.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, PresetsCommand};
use prompt_helper_core::config::ConfigManager;
use prompt_helper_core::config::constants::defaults;
use prompt_helper_core::images::ListOptions;
use prompt_helper_core::preset::PresetStore;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let workspace = match args.workspace.clone() {
        Some(path) => path,
        None => std::env::current_dir().context("cannot determine current dir")?,
    };

    let manager = match &args.config {
        Some(path) => ConfigManager::load_from_file(path)?,
        None => ConfigManager::load_from_workspace(&workspace)?,
    };
    if let Some(path) = manager.config_path() {
        tracing::debug!(config = %path.display(), "using configuration file");
    }

    let store = || match &args.presets_dir {
        Some(dir) => PresetStore::new(dir.clone(), manager.config().presets.load_options()),
        None => manager.preset_store(),
    };

    match args.command {
        Commands::Presets(PresetsCommand::List { kind }) => {
            cli::presets::handle_list_command(&store(), kind.map(Into::into))
        }
        Commands::Presets(PresetsCommand::Show { key, json }) => {
            cli::presets::handle_show_command(&store(), &key, json)
        }
        Commands::Compose {
            fragments,
            multiplier,
        } => cli::prompt::handle_compose_command(&fragments, multiplier),
        Commands::Normalize { text } => cli::prompt::handle_normalize_command(&text),
        Commands::Join { sep, parts } => cli::prompt::handle_join_command(&sep, &parts),
        Commands::Format { pattern, args } => cli::prompt::handle_format_command(&pattern, &args),
        Commands::Images {
            directory,
            sort,
            skips,
            trim_suffix,
        } => {
            let configured = manager.config().images.list_options();
            let options = ListOptions {
                skips,
                sort: sort.unwrap_or(configured.sort),
                trim_suffix,
                ..configured
            };
            cli::images::handle_images_command(&directory, &options)
        }
        Commands::Init { force } => cli::init::handle_init_command(&workspace, force),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { defaults::LOG_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
