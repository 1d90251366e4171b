use anyhow::Result;
use prompt_helper_core::compose::{WeightedFragment, compose};
use prompt_helper_core::text::{format_pattern, join_strings, normalize};

/// Handle `compose`
pub fn handle_compose_command(fragments: &[WeightedFragment], multiplier: f64) -> Result<()> {
    println!("{}", compose(fragments, multiplier));
    Ok(())
}

/// Handle `normalize`
pub fn handle_normalize_command(text: &[String]) -> Result<()> {
    println!("{}", normalize(&text.join(" ")));
    Ok(())
}

/// Handle `join`
pub fn handle_join_command(sep: &str, parts: &[String]) -> Result<()> {
    println!("{}", join_strings(sep, parts));
    Ok(())
}

/// Handle `format`
pub fn handle_format_command(pattern: &str, args: &[String]) -> Result<()> {
    println!("{}", format_pattern(pattern, args));
    Ok(())
}
