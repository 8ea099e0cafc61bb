//! Configuration management commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CampusConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { base_url, force } => init_config(&base_url, force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        let mut redacted = ctx.config.clone();
        if redacted.api.token.is_some() {
            redacted.api.token = Some("(set)".to_string());
        }
        ctx.output.json(&redacted);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    for (section, keys) in [
        ("api", &["base_url", "token", "currency", "timeout_secs"][..]),
        ("cart", &["path"][..]),
        ("search", &["debounce_ms"][..]),
        ("logging", &["level", "format"][..]),
    ] {
        ctx.output.info("");
        ctx.output.info(&format!("[{section}]"));
        for key in keys {
            let value = ctx.config.get(&format!("{section}.{key}"))?;
            ctx.output.kv(key, &value);
        }
    }

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = ctx.config.get(key)?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(config_path) = &ctx.config_path else {
        bail!("No config file found. Run `campus config init` first.");
    };

    // Edit the file as stored, without environment overrides.
    let mut config = CampusConfig::load(config_path)?;
    config.set(key, value)?;
    config.save(config_path)?;

    let shown = if key == "api.token" { "(set)" } else { value };
    ctx.output.success(&format!("Set {} = {}", key, shown));

    Ok(())
}

fn init_config(base_url: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.default_config_path();

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, generate_default_config(base_url))?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}
