//! Cache command - inspect and clear cached lists.

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;
use wallfeed_store::{JsonFileCache, WallpaperCache};

use crate::app::load_config;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the cache command.
#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands.
#[derive(Subcommand)]
pub enum CacheAction {
    /// List cached queries.
    List,

    /// Remove every cached list.
    Clear,
}

/// Runs the cache command.
pub async fn run(args: &CacheArgs, cli: &Cli) -> Result<ExitCode> {
    let config = load_config(cli)?;
    let cache = JsonFileCache::open(config.cache_path()).await;

    match args.action {
        CacheAction::List => {
            let entries = cache.query("").await?;
            match cli.format {
                OutputFormat::Text => {
                    let formatter = TextFormatter::new(!cli.no_color);
                    if entries.is_empty() {
                        println!("Cache is empty.");
                    }
                    for entry in &entries {
                        let stale = entry.is_stale(config.cache_ttl());
                        println!(
                            "{}{}",
                            formatter.format_list_header(entry, true),
                            if stale { " (stale)" } else { "" }
                        );
                    }
                }
                OutputFormat::Json => {
                    let summary: Vec<_> = entries
                        .iter()
                        .map(|e| {
                            serde_json::json!({
                                "key": e.key,
                                "items": e.items.len(),
                                "fetchedAt": e.fetched_at,
                                "stale": e.is_stale(config.cache_ttl()),
                            })
                        })
                        .collect();
                    println!("{}", JsonFormatter::new(cli.pretty).format(&summary)?);
                }
            }
        }
        CacheAction::Clear => {
            cache.clear().await?;
            info!(path = %cache.path().display(), "Cache cleared");
            if !cli.quiet {
                println!("Cache cleared");
            }
        }
    }
    Ok(ExitCode::Success)
}
