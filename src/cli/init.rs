use anyhow::{Result, bail};
use console::style;
use prompt_helper_core::config::PromptHelperConfig;
use prompt_helper_core::config::constants::defaults;
use std::path::Path;

/// Handle the init command
pub fn handle_init_command(workspace: &Path, force: bool) -> Result<()> {
    let config_path = workspace.join(defaults::CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    PromptHelperConfig::create_sample_config(&config_path)?;
    println!(
        "{} {}",
        style("Created").green().bold(),
        config_path.display()
    );
    Ok(())
}
