//! List commands: featured, search, random, collection, collections.

use anyhow::Result;
use clap::Args;
use futures::{Stream, StreamExt};
use tracing::{debug, info};
use wallfeed_core::{CallOutcome, ProviderError, ProviderId, SearchFilters};
use wallfeed_store::CacheEntry;

use super::print_stats;
use crate::app::App;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

// ============================================================================
// Arguments
// ============================================================================

/// Paging arguments.
#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    /// Page number, starting at 1.
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Wallpapers per page.
    #[arg(long, default_value = "24")]
    pub per_page: u32,
}

impl Default for PageArgs {
    fn default() -> Self {
        Self { page: 1, per_page: 24 }
    }
}

/// Arguments for the search command.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search terms.
    pub query: String,

    /// Orientation filter (landscape, portrait, squarish).
    #[arg(long)]
    pub orientation: Option<String>,

    /// Color filter.
    #[arg(long)]
    pub color: Option<String>,

    /// Category filter.
    #[arg(long)]
    pub category: Option<String>,

    #[command(flatten)]
    pub paging: PageArgs,
}

impl SearchArgs {
    fn filters(&self) -> SearchFilters {
        [
            ("orientation", &self.orientation),
            ("color", &self.color),
            ("category", &self.category),
        ]
        .into_iter()
        .filter_map(|(key, value)| Some((key.to_string(), value.clone()?)))
        .collect()
    }
}

/// Arguments for the random command.
#[derive(Args, Debug)]
pub struct RandomArgs {
    /// Number of wallpapers.
    #[arg(long, short = 'n', default_value = "10")]
    pub count: u32,

    /// Restrict to a category.
    #[arg(long)]
    pub category: Option<String>,
}

/// Arguments for the collection command.
#[derive(Args, Debug)]
pub struct CollectionArgs {
    /// Namespaced collection id, e.g. `unsplash_317099`.
    pub id: String,

    #[command(flatten)]
    pub paging: PageArgs,
}

/// Arguments for the collections command.
#[derive(Args, Debug)]
pub struct CollectionsArgs {
    /// Provider to list collections for.
    pub provider: ProviderId,

    #[command(flatten)]
    pub paging: PageArgs,
}

// ============================================================================
// Commands
// ============================================================================

/// Runs the featured command.
pub async fn featured(args: &PageArgs, cli: &Cli) -> Result<ExitCode> {
    let app = App::build(cli).await?;
    let states = app.repo.featured(args.page, args.per_page);
    finish_list(&app, cli, states).await
}

/// Runs the search command.
pub async fn search(args: &SearchArgs, cli: &Cli) -> Result<ExitCode> {
    let app = App::build(cli).await?;
    info!(query = %args.query, "Searching");
    let states = app
        .repo
        .search(&args.query, args.filters(), args.paging.page, args.paging.per_page);
    finish_list(&app, cli, states).await
}

/// Runs the random command.
pub async fn random(args: &RandomArgs, cli: &Cli) -> Result<ExitCode> {
    let app = App::build(cli).await?;
    let states = app.repo.random(args.count, args.category.as_deref());
    finish_list(&app, cli, states).await
}

/// Runs the collection command.
pub async fn collection(args: &CollectionArgs, cli: &Cli) -> Result<ExitCode> {
    let app = App::build(cli).await?;
    let states = app
        .repo
        .collection(&args.id, args.paging.page, args.paging.per_page);
    finish_list(&app, cli, states).await
}

/// Runs the collections command.
pub async fn collections(args: &CollectionsArgs, cli: &Cli) -> Result<ExitCode> {
    let app = App::build(cli).await?;
    let outcome = app
        .repo
        .collections(args.provider, args.paging.page, args.paging.per_page)
        .await;

    let code = match outcome {
        CallOutcome::Success(collections) => {
            match cli.format {
                OutputFormat::Text => {
                    let formatter = TextFormatter::new(!cli.no_color);
                    if collections.is_empty() {
                        println!("No collections.");
                    }
                    for collection in &collections {
                        println!("{}", formatter.format_collection_line(collection));
                    }
                }
                OutputFormat::Json => {
                    println!("{}", JsonFormatter::new(cli.pretty).format_collections(&collections)?);
                }
            }
            ExitCode::Success
        }
        CallOutcome::Error(err) => report_error(&err, cli)?,
        CallOutcome::Loading => ExitCode::Success,
    };
    print_stats(&app, cli)?;
    Ok(code)
}

// ============================================================================
// Settling Reconciler Output
// ============================================================================

/// What a reconciliation cycle ended with.
#[derive(Debug, Default)]
pub struct Settled {
    /// Last list emitted.
    pub entry: Option<CacheEntry>,
    /// Whether `entry` came from the cache rather than this run's fetch.
    pub from_cache: bool,
    /// Refresh failure, if the cycle ended with one.
    pub error: Option<ProviderError>,
}

impl Settled {
    /// Folds the emitted states in order.
    pub fn from_states(states: impl IntoIterator<Item = CallOutcome<CacheEntry>>) -> Self {
        let mut settled = Self::default();
        for (index, state) in states.into_iter().enumerate() {
            match state {
                CallOutcome::Success(entry) => {
                    settled.entry = Some(entry);
                    settled.from_cache = index == 0;
                }
                CallOutcome::Error(err) => settled.error = Some(err),
                CallOutcome::Loading => {}
            }
        }
        settled
    }
}

async fn finish_list(
    app: &App,
    cli: &Cli,
    states: impl Stream<Item = CallOutcome<CacheEntry>>,
) -> Result<ExitCode> {
    let states: Vec<_> = states
        .inspect(|state| {
            if matches!(state, CallOutcome::Loading) {
                debug!("Nothing cached, fetching");
            }
        })
        .collect()
        .await;
    let settled = Settled::from_states(states);

    let code = match (&settled.entry, &settled.error) {
        (Some(entry), error) => {
            print_list(entry, settled.from_cache, error.as_ref(), cli)?;
            ExitCode::Success
        }
        (None, Some(err)) => report_error(err, cli)?,
        (None, None) => ExitCode::Success,
    };
    print_stats(app, cli)?;
    Ok(code)
}

fn print_list(
    entry: &CacheEntry,
    from_cache: bool,
    error: Option<&ProviderError>,
    cli: &Cli,
) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_list_header(entry, from_cache));
            for wallpaper in &entry.items {
                println!("{}", formatter.format_wallpaper_line(wallpaper));
            }
            if let Some(err) = error {
                if !cli.quiet {
                    eprintln!("Showing cached results, refresh failed: {}", formatter.format_error(err));
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format_list(entry, from_cache, error)?);
        }
    }
    Ok(())
}

/// Prints a failure and picks the exit code for it.
pub fn report_error(error: &ProviderError, cli: &Cli) -> Result<ExitCode> {
    match cli.format {
        OutputFormat::Text => {
            if !cli.quiet {
                eprintln!("{}", TextFormatter::new(!cli.no_color).format_error(error));
            }
        }
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format_error(error)?),
    }
    Ok(if error.is_rate_limited() {
        ExitCode::RateLimited
    } else {
        ExitCode::Error
    })
}

// ============================================================================
// Tests
// ============================================================================
