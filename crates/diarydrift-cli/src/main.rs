//! DiaryDrift CLI - keep a mood journal from the terminal

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;
mod managed_sync;

use std::path::Path;

use clap::Parser;
use diarydrift_core::{AppContext, DatabaseService};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::common::{require_dashboard, resolve_db_path, ActiveProfile};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::export::run_export;
use crate::commands::home::run_home;
use crate::commands::journal::run_journal;
use crate::commands::profile::run_profile;
use crate::commands::sync::run_sync;
use crate::commands::task::run_task;
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

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("diarydrift=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);
    let profile_flag = cli.profile.as_deref();

    match cli.command {
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
        Commands::Config { command } => run_config(command, profile_flag),
        Commands::Auth { command } => run_auth(command, profile_flag, &db_path).await,
        Commands::Sync => {
            let active = ActiveProfile::load(profile_flag).await?;
            let db = active.open_sync_database(&db_path).await?;
            run_sync(&db).await
        }
        Commands::Home {
            watch,
            interval,
            json,
        } => {
            let (db, context) = open_dashboard(profile_flag, &db_path).await?;
            run_home(&db, &context, json, watch, interval).await
        }
        Commands::Journal { command } => {
            let (db, context) = open_dashboard(profile_flag, &db_path).await?;
            run_journal(command, &db, &context).await
        }
        Commands::Task { command } => {
            let (db, context) = open_dashboard(profile_flag, &db_path).await?;
            run_task(command, &db, &context).await
        }
        Commands::Profile { command } => {
            let (db, context) = open_dashboard(profile_flag, &db_path).await?;
            run_profile(command, &db, &context).await
        }
        Commands::Export {
            format,
            output,
            include_media,
        } => {
            let (db, _context) = open_dashboard(profile_flag, &db_path).await?;
            run_export(&db, format, output.as_deref(), include_media).await
        }
    }
}

/// Resolve the profile, pass the auth gate and open the database.
async fn open_dashboard(
    profile_flag: Option<&str>,
    db_path: &Path,
) -> Result<(DatabaseService, AppContext), CliError> {
    let active = ActiveProfile::load(profile_flag).await?;
    let context = active.app_context();
    require_dashboard(&context, &active.name)?;
    let db = active.open_database(db_path).await?;
    Ok((db, context))
}
