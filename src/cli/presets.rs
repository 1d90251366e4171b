use anyhow::{Context, Result};
use console::style;
use prompt_helper_core::preset::{PresetEntry, PresetKind, PresetStore};

/// Handle `presets list`
pub fn handle_list_command(store: &PresetStore, kind: Option<PresetKind>) -> Result<()> {
    let snapshot = store
        .presets()
        .with_context(|| format!("failed to load presets from {}", store.root().display()))?;

    for skipped in snapshot.skipped() {
        eprintln!(
            "{} {} ({})",
            style("skipped").yellow().bold(),
            skipped.path.display(),
            skipped.reason
        );
    }

    let keys: Vec<&str> = match kind {
        Some(kind) => snapshot.keys_of(kind).collect(),
        None => snapshot.keys().collect(),
    };
    if keys.is_empty() {
        println!("{}", style("No presets found").dim());
        return Ok(());
    }
    for key in keys {
        println!("{key}");
    }
    Ok(())
}

/// Handle `presets show`
pub fn handle_show_command(store: &PresetStore, key: &str, json: bool) -> Result<()> {
    let entry = store.get(key)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
        return Ok(());
    }

    match entry {
        PresetEntry::Simple { text } => println!("{text}"),
        PresetEntry::Structured(preset) => {
            let (positive, negative, name, model, clip, stack) = preset.outputs();
            println!("{} {positive}", style("positive:").green().bold());
            println!("{} {negative}", style("negative:").red().bold());
            println!(
                "{} {name} (model {model:.3}, clip {clip:.3})",
                style("lora:").cyan().bold()
            );
            if !stack.is_empty() {
                println!("{}", style("lora stack:").cyan().bold());
                for adapter in stack {
                    println!(
                        "  {} (model {:.3}, clip {:.3})",
                        adapter.name, adapter.strength_primary, adapter.strength_secondary
                    );
                }
            }
        }
    }
    Ok(())
}

