//! MySQL backup tool
//!
//! Provides the `backup:sql` command: a timestamped, optionally gzipped mysqldump
//! of the configured database written into the backup directory.

// sqlbackup/src/main.rs
mod backup;
mod cli;
mod config;
mod errors;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::AppConfig;
use errors::AppError;
use std::process::ExitCode;
use utils::output::ConsoleSink;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine.
    let _ = dotenv::dotenv();
    init_tracing();

    let cli = Cli::parse();
    match run_app(&cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            let code = e
                .downcast_ref::<AppError>()
                .map_or(1, AppError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_app(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::BackupSql { .. } => {
            let app_config = AppConfig::load(&cli.config).context(format!(
                "Failed to load application configuration from {}",
                cli.config.display()
            ))?;
            let request = cli.backup_request();
            let mut sink = ConsoleSink;

            let artifact = backup::run_backup_flow(&app_config, &request, &mut sink).await?;
            println!("✅ Backup written to {}", artifact.path.display());
        }
    }
    Ok(())
}
