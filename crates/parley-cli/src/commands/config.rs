use anyhow::{Context, Result};
use colored::Colorize;
use parley_interaction::presets::system_prompt_presets;

use super::AppContext;

pub fn init(ctx: &AppContext, force: bool) -> Result<()> {
    let path = ctx.config().path().display().to_string();
    if ctx.config().init_default(force)? {
        println!("{}", format!("Wrote default configuration to {}", path).green());
        println!(
            "{}",
            "Set service.model_version and PARLEY_API_TOKEN before asking.".bright_black()
        );
    } else {
        println!(
            "{}",
            format!("{} already exists; use --force to overwrite", path).yellow()
        );
    }
    Ok(())
}

/// Prints the effective configuration with the API token masked.
pub fn show(ctx: &AppContext) -> Result<()> {
    let mut config = ctx.config().get_config()?;
    if !config.service.api_token.is_empty() {
        config.service.api_token = "<redacted>".to_string();
    }
    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
    print!("{}", rendered);
    if let Err(e) = config.validate() {
        eprintln!("{}", e.to_string().yellow());
    }
    Ok(())
}

pub fn path(ctx: &AppContext) {
    println!("{}", ctx.config().path().display());
}

pub fn presets() {
    for preset in system_prompt_presets() {
        println!("{}", preset.name.bright_cyan().bold());
        println!("  {}", preset.prompt.bright_black());
    }
}
