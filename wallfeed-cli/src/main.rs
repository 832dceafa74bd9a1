// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Wallfeed CLI - browse wallpapers from several providers.
//!
//! # Examples
//!
//! ```bash
//! # Featured wallpapers from whichever provider has the most headroom
//! wallfeed
//!
//! # Search a single provider
//! wallfeed search "northern lights" --provider wallhaven
//!
//! # JSON output
//! wallfeed random --count 5 --format json --pretty
//!
//! # Ignore the cache
//! wallfeed featured --page 2 --refresh
//!
//! # List providers and their keys
//! wallfeed providers
//! ```

mod app;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{browse, cache, config, providers, show};

// ============================================================================
// CLI Definition
// ============================================================================

/// Wallfeed CLI - multi-provider wallpaper browser.
#[derive(Parser)]
#[command(name = "wallfeed")]
#[command(about = "Browse wallpapers across Unsplash, Pexels, Pixabay and Wallhaven")]
#[command(long_about = r#"
Wallfeed aggregates wallpapers from several providers, spreading calls
across them by quota and serving cached results when offline.

Supported providers:
  • Unsplash  (unsplash)   UNSPLASH_ACCESS_KEY
  • Pexels    (pexels)     PEXELS_API_KEY
  • Pixabay   (pixabay)    PIXABAY_API_KEY
  • Wallhaven (wallhaven)  WALLHAVEN_API_KEY, optional

Examples:
  wallfeed                           # Featured wallpapers
  wallfeed search ocean              # Search
  wallfeed random --category nature  # Random picks
  wallfeed --provider pexels         # Only use Pexels
  wallfeed --format json             # JSON output
"#)]
#[command(version)]
#[command(author = "Wallfeed Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'featured' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Providers to use, comma-separated ("all" for every provider).
    #[arg(long, short, global = true)]
    pub provider: Option<String>,

    /// Configuration file. Defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Fetch even when the cache is fresh.
    #[arg(long, short, global = true)]
    pub refresh: bool,

    /// Print per-provider call counters after the command.
    #[arg(long, global = true)]
    pub stats: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Curated wallpapers (default if no command specified).
    #[command(visible_alias = "f")]
    Featured(browse::PageArgs),

    /// Search wallpapers.
    #[command(visible_alias = "s")]
    Search(browse::SearchArgs),

    /// Random wallpapers.
    #[command(visible_alias = "r")]
    Random(browse::RandomArgs),

    /// Wallpapers in a collection.
    Collection(browse::CollectionArgs),

    /// List a provider's collections.
    Collections(browse::CollectionsArgs),

    /// Show one wallpaper.
    Show(show::ShowArgs),

    /// Report a download to the owning provider.
    Download(show::ShowArgs),

    /// List providers and their configuration.
    #[command(visible_alias = "p")]
    Providers,

    /// Manage configuration.
    Config(config::ConfigArgs),

    /// Manage the wallpaper cache.
    Cache(cache::CacheArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// No provider is usable with the current keys.
    NoProviders = 2,
    /// The provider refused the call because of its rate limit.
    RateLimited = 3,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("wallfeed=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wallfeed=warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Featured(args)) => browse::featured(args, &cli).await,
        Some(Commands::Search(args)) => browse::search(args, &cli).await,
        Some(Commands::Random(args)) => browse::random(args, &cli).await,
        Some(Commands::Collection(args)) => browse::collection(args, &cli).await,
        Some(Commands::Collections(args)) => browse::collections(args, &cli).await,
        Some(Commands::Show(args)) => show::run(args, &cli).await,
        Some(Commands::Download(args)) => show::download(args, &cli).await,
        Some(Commands::Providers) => providers::run(&cli),
        Some(Commands::Config(args)) => config::run(args, &cli),
        Some(Commands::Cache(args)) => cache::run(args, &cli).await,
        None => browse::featured(&browse::PageArgs::default(), &cli).await,
    };

    match result {
        Ok(ExitCode::Success) => Ok(()),
        Ok(code) => std::process::exit(code as i32),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            let code = if e.downcast_ref::<app::NoUsableProviders>().is_some() {
                ExitCode::NoProviders
            } else {
                ExitCode::Error
            };
            std::process::exit(code as i32);
        }
    }
}
