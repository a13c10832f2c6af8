//! Config command implementation.
//!
//! View the effective configuration or create the default file.

use crate::cli::{Cli, ConfigAction, ConfigArgs};
use crate::config::{default_config_path, Config};
use crate::error::{DigestError, Result};

/// Run the config command.
pub fn run(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli),
        ConfigAction::Path => show_config_path(cli),
        ConfigAction::Init { force } => init_config(cli, *force),
    }
}

/// Show the effective configuration as TOML.
fn show_config(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    let toml = toml::to_string_pretty(&config).map_err(|e| DigestError::ConfigError {
        message: format!("Failed to serialize config: {e}"),
    })?;
    print!("{toml}");
    Ok(())
}

/// Show configuration file path.
fn show_config_path(cli: &Cli) -> Result<()> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    println!("{}", path.display());
    Ok(())
}

/// Initialize configuration file with defaults.
fn init_config(cli: &Cli, force: bool) -> Result<()> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    if path.exists() && !force {
        println!("Configuration file already exists at: {}", path.display());
        println!("Use 'digest config init --force' to reset it to defaults.");
        return Ok(());
    }

    Config::default().save_to(&path)?;
    println!("Created configuration file at: {}", path.display());

    Ok(())
}
