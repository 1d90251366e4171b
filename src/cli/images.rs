use anyhow::Result;
use console::style;
use prompt_helper_core::images::{ListOptions, list_images};
use std::path::Path;

/// Handle `images`
pub fn handle_images_command(directory: &Path, options: &ListOptions) -> Result<()> {
    let files = list_images(directory, options)?;
    println!(
        "{} {} image(s), sort: {}",
        style("Found").blue().bold(),
        files.len(),
        options.sort
    );
    for file in files {
        println!("{:>4}  {}", file.index, file.filename);
    }
    Ok(())
}
