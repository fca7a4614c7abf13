//! PebbleNote CLI - browse, buy and administer note listings from the terminal

mod cli;
mod commands;
mod error;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::buy::{run_buy, run_purchases};
use crate::commands::common::{load_config, open_service, resolve_config_path, resolve_db_path};
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::export::run_export;
use crate::commands::list::run_list;
use crate::commands::pull::run_pull;
use crate::commands::seed::run_seed;
use crate::commands::show::run_show;
use crate::commands::stats::run_stats;
use crate::commands::toggle::run_toggle;
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

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "pebblenote=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell, output } = &cli.command {
        return run_completions(*shell, output.as_deref());
    }

    let db_path = resolve_db_path(cli.db_path)?;
    let config = load_config(&resolve_config_path(cli.config)?)?;
    let service = open_service(&db_path, &config)?;

    let outcome = match cli.command {
        Commands::Add { note } => run_add(note, &service).await,
        Commands::List { all, json } => run_list(all, json, &service).await,
        Commands::Show { id, json } => run_show(&id, json, &service).await,
        Commands::Edit { id, changes } => run_edit(&id, changes, &service).await,
        Commands::Delete { id } => run_delete(&id, &service).await,
        Commands::Toggle { id } => run_toggle(&id, &service).await,
        Commands::Stats { json } => run_stats(json, &service).await,
        Commands::Buy { id, method } => run_buy(&id, method, &service).await,
        Commands::Purchases { json } => run_purchases(json, &service).await,
        Commands::Pull => run_pull(&service).await,
        Commands::Seed => run_seed(&service).await,
        Commands::Export { format, output } => {
            run_export(format, output.as_deref(), &service).await
        }
        Commands::Completions { .. } => Ok(()),
    };

    service.drain_mirror(config.mirror_flush_timeout()).await;

    outcome
}
