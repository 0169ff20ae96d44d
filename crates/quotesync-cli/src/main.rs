//! quotesync CLI - Collect quotes from the terminal
//!
//! Keeps a local quote list and merges it with a remote feed.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::categories::run_categories;
use crate::commands::common::{load_settings, open_book, resolve_config_path, resolve_data_dir};
use crate::commands::completions::{run_completions, CompletionTarget};
use crate::commands::config::run_config;
use crate::commands::export::run_export;
use crate::commands::filter::run_filter;
use crate::commands::import::run_import;
use crate::commands::list::run_list;
use crate::commands::random::run_random;
use crate::commands::sync::run_sync;
use crate::commands::watch::run_watch;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let directive = "quotesync=info"
        .parse::<Directive>()
        .map_err(|error| CliError::Config(format!("invalid log directive: {error}")))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config)?;

    let command = match cli.command {
        Some(Commands::Completions { shell, output, dir }) => {
            let target = match (output.as_deref(), dir.as_deref()) {
                (Some(path), _) => CompletionTarget::File(path),
                (None, Some(dir)) => CompletionTarget::Directory(dir),
                (None, None) => CompletionTarget::Stdout,
            };
            return run_completions(shell, target);
        }
        Some(Commands::Config { command }) => return run_config(command, &config_path),
        Some(command) => command,
        None => {
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    let settings = load_settings(&config_path)?;
    let data_dir = resolve_data_dir(cli.data_dir)?;
    let book = open_book(&data_dir, &settings)?;

    match command {
        Commands::Add { text, category } => run_add(&text, &category, &book).await?,
        Commands::List { category, json } => run_list(category.as_deref(), json, &book).await?,
        Commands::Random { category } => run_random(category.as_deref(), &book).await?,
        Commands::Categories => run_categories(&book).await?,
        Commands::Filter { category } => run_filter(&category, &book).await?,
        Commands::Export { output } => run_export(output.as_deref(), &book).await?,
        Commands::Import { path } => run_import(&path, &book).await?,
        Commands::Sync { manual, offline } => run_sync(manual, offline, &settings, &book).await?,
        Commands::Watch { interval, manual } => {
            run_watch(interval, manual, &settings, &book).await?;
        }
        Commands::Config { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}
