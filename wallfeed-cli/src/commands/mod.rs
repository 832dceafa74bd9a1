//! CLI command implementations.

pub mod browse;
pub mod cache;
pub mod config;
pub mod providers;
pub mod show;

use anyhow::Result;
use wallfeed_core::ProviderId;

use crate::app::App;
use crate::output::{JsonFormatter, StatsRow, TextFormatter};
use crate::{Cli, OutputFormat};

/// Prints this run's call counters to stderr when `--stats` is set.
pub fn print_stats(app: &App, cli: &Cli) -> Result<()> {
    if !cli.stats {
        return Ok(());
    }

    let quotas = app.ctx.balancer.quotas();
    let rows: Vec<StatsRow> = ProviderId::all()
        .iter()
        .copied()
        .filter(|p| quotas.get(*p).is_some())
        .map(|provider| StatsRow {
            provider,
            counters: app.ctx.tracker.stats_for(provider),
            quota: quotas.get(provider),
            reserved: app.ctx.balancer.reserved(provider),
        })
        .collect();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            for row in &rows {
                eprintln!("{}", formatter.format_stats_line(row));
            }
        }
        OutputFormat::Json => eprintln!("{}", JsonFormatter::new(cli.pretty).format_stats(&rows)?),
    }
    Ok(())
}
