//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { base_url, force } => init_config(&base_url, force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");

    let api = &ctx.config.api;
    ctx.output.info("");
    ctx.output.info("[api]");
    ctx.output.kv("base_url", &api.base_url);
    ctx.output
        .kv("request_timeout", &format!("{}s", api.request_timeout.as_secs()));
    ctx.output
        .kv("connect_timeout", &format!("{}s", api.connect_timeout.as_secs()));
    ctx.output.kv("user_agent", &api.user_agent);

    ctx.output.info("");
    ctx.output.info("[store]");
    ctx.output.kv("name", &ctx.config.store.name);
    ctx.output
        .kv("receipt_width", &ctx.config.store.receipt_width.to_string());

    let printer = &ctx.config.printer;
    ctx.output.info("");
    ctx.output.info("[printer]");
    match printer.device {
        Some(ref device) => ctx.output.kv("device", &device.display().to_string()),
        None => ctx.output.kv("device", "(none)"),
    }
    ctx.output
        .kv("chunk_size", &printer.options.chunk_size.to_string());
    ctx.output.kv(
        "chunk_delay",
        &format!("{}ms", printer.options.chunk_delay.as_millis()),
    );
    ctx.output.kv(
        "connect_timeout",
        &format!("{}ms", printer.options.connect_timeout.as_millis()),
    );

    ctx.output.info("");
    ctx.output
        .kv("session", &ctx.session_path.display().to_string());
    Ok(())
}

fn init_config(base_url: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("kasir.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let content = generate_default_config(base_url);
    // The generated file must load back cleanly.
    toml::from_str::<CliConfig>(&content)?.api.validate()?;
    fs::write(&config_path, content)?;

    ctx.output.success(&format!("Created: {}", config_path.display()));
    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check(&ctx.config, |path| ctx.resolve_path(path).exists());

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }
    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");
    Ok(())
}

fn check(config: &CliConfig, device_exists: impl Fn(&str) -> bool) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Err(e) = config.api.validate() {
        errors.push(e.to_string());
    }

    if config.store.name.trim().is_empty() {
        warnings.push("store.name is empty; receipts will have no header".to_string());
    }
    if config.store.receipt_width < kasir_core::receipt::MIN_RECEIPT_WIDTH {
        warnings.push(format!(
            "store.receipt_width {} is below {} and will be widened",
            config.store.receipt_width,
            kasir_core::receipt::MIN_RECEIPT_WIDTH
        ));
    }

    match config.printer.device {
        Some(ref device) => {
            let path = device.to_string_lossy();
            if !device_exists(&path) {
                warnings.push(format!("printer.device '{}' does not exist", path));
            }
        }
        None => warnings.push("printer.device is not set; printing is disabled".to_string()),
    }
    if config.printer.options.chunk_size == 0 {
        errors.push("printer.chunk_size must be greater than 0".to_string());
    }

    (errors, warnings)
}
