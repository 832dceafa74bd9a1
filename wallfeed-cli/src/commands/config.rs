//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::info;
use wallfeed_core::ProviderId;
use wallfeed_store::{Config, ProviderConfig, default_config_dir};

use crate::app::load_config;
use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Enable a provider.
    Enable {
        /// Provider to enable.
        provider: ProviderId,
    },

    /// Disable a provider.
    Disable {
        /// Provider to disable.
        provider: ProviderId,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, cli: &Cli) -> Result<ExitCode> {
    match &args.action {
        ConfigAction::Show => show_config(cli)?,
        ConfigAction::Path => show_paths(cli)?,
        ConfigAction::Enable { provider } => set_enabled(*provider, true, cli)?,
        ConfigAction::Disable { provider } => set_enabled(*provider, false, cli)?,
        ConfigAction::Reset => reset_config(cli)?,
    }
    Ok(ExitCode::Success)
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(Config::default_path)
}

fn show_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match cli.format {
        OutputFormat::Text => {
            let general = &config.general;
            println!("Wallfeed Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Max retries:     {}", general.max_retries);
            println!("Backoff base:    {}ms", general.backoff_base_ms);
            println!("Reset window:    {}s", general.reset_window_secs);
            println!("Timeout:         {}s", general.timeout_secs);
            println!("Cache TTL:       {}s", general.cache_ttl_secs);
            println!("Cache retention: {}s", general.cache_retention_secs);
            println!("Cache file:      {}", config.cache_path().display());
            println!();
            println!("Providers:");
            for provider in ProviderId::all() {
                let state = if config.is_provider_enabled(*provider) {
                    "enabled"
                } else {
                    "disabled"
                };
                let quota = config
                    .quotas
                    .get(*provider)
                    .map_or_else(|| "no quota".to_string(), |q| format!("{q}/window"));
                println!("  • {:<10} {state:<9} {quota}", provider.display_name());
            }
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&config)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let config_file = config_path(cli);
    let cache_file = load_config(cli)?.cache_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:  {}", config_dir.display());
            println!("Config file: {}", config_file.display());
            println!("Cache file:  {}", cache_file.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "config_file": config_file.display().to_string(),
                "cache_file": cache_file.display().to_string(),
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&paths)?);
        }
    }

    Ok(())
}

fn set_enabled(provider: ProviderId, enabled: bool, cli: &Cli) -> Result<()> {
    let mut config = load_config(cli)?;
    config
        .providers
        .entry(provider)
        .or_insert_with(ProviderConfig::default)
        .enabled = enabled;
    config.save_to(&config_path(cli))?;

    info!(provider = %provider, enabled, "Provider toggled");
    let verb = if enabled { "Enabled" } else { "Disabled" };
    println!("{verb}: {}", provider.display_name());
    Ok(())
}

fn reset_config(cli: &Cli) -> Result<()> {
    let path = config_path(cli);

    if path.exists() {
        std::fs::remove_file(&path)?;
        info!(path = %path.display(), "Configuration reset");
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }

    Ok(())
}
