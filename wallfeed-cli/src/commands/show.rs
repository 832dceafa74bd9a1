//! Show and download commands - single wallpaper operations.

use anyhow::Result;
use clap::Args;
use serde_json::json;
use wallfeed_core::CallOutcome;

use super::browse::report_error;
use super::print_stats;
use crate::app::App;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments naming one wallpaper.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Namespaced wallpaper id, e.g. `wallhaven_94x38z`.
    pub id: String,
}

/// Runs the show command.
pub async fn run(args: &ShowArgs, cli: &Cli) -> Result<ExitCode> {
    let app = App::build(cli).await?;

    let code = match app.repo.wallpaper(&args.id).await {
        CallOutcome::Success(Some(wallpaper)) => {
            match cli.format {
                OutputFormat::Text => {
                    println!("{}", TextFormatter::new(!cli.no_color).format_wallpaper_detail(&wallpaper));
                }
                OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format(&wallpaper)?),
            }
            ExitCode::Success
        }
        CallOutcome::Success(None) => {
            if !cli.quiet {
                eprintln!("Wallpaper not found: {}", args.id);
            }
            ExitCode::Error
        }
        CallOutcome::Error(err) => report_error(&err, cli)?,
        CallOutcome::Loading => ExitCode::Success,
    };
    print_stats(&app, cli)?;
    Ok(code)
}

/// Runs the download command.
pub async fn download(args: &ShowArgs, cli: &Cli) -> Result<ExitCode> {
    let app = App::build(cli).await?;

    let code = match app.repo.track_download(&args.id).await {
        CallOutcome::Error(err) => report_error(&err, cli)?,
        _ => {
            match cli.format {
                OutputFormat::Text => {
                    if !cli.quiet {
                        println!("Download recorded: {}", args.id);
                    }
                }
                OutputFormat::Json => {
                    println!("{}", JsonFormatter::new(cli.pretty).format(&json!({ "id": args.id, "tracked": true }))?);
                }
            }
            ExitCode::Success
        }
    };
    print_stats(&app, cli)?;
    Ok(code)
}
