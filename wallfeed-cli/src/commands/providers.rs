//! Providers command - list providers and their configuration.

use anyhow::Result;
use tracing::info;
use wallfeed_core::ProviderId;
use wallfeed_providers::{default_env_var, requires_key};

use crate::app::{load_config, registry_options};
use crate::output::{JsonFormatter, ProviderRow, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Runs the providers command. Makes no network calls.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    info!("Listing providers");

    let config = load_config(cli)?;
    let options = registry_options(&config, cli)?;
    let env_names = config.api_key_env_names();

    let rows: Vec<ProviderRow> = ProviderId::all()
        .iter()
        .map(|&provider| ProviderRow {
            provider,
            enabled: options.enabled.contains(&provider),
            key_var: env_names
                .get(&provider)
                .cloned()
                .unwrap_or_else(|| default_env_var(provider).to_string()),
            key_required: requires_key(provider),
            has_key: options.keys.get(provider).is_some(),
            quota: config.quotas.get(provider),
        })
        .collect();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            println!("{}", formatter.format_providers_header());
            println!("{}", "─".repeat(64));
            for row in &rows {
                println!("{}", formatter.format_provider_line(row));
            }

            println!();
            println!(
                "Total: {} providers ({} ready)",
                rows.len(),
                rows.iter().filter(|r| r.usable()).count()
            );
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format_providers(&rows)?);
        }
    }

    let code = if rows.iter().any(ProviderRow::usable) {
        ExitCode::Success
    } else {
        ExitCode::NoProviders
    };
    Ok(code)
}
