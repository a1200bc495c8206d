//! CLI argument parsing

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{BackupRequest, DEFAULT_DUMP_BINARY};
use crate::utils::output::Verbosity;

#[derive(Parser, Debug)]
#[command(name = "sqlbackup")]
#[command(author, version, about = "Timestamped MySQL backups through mysqldump", long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, global = true, default_value = "config.json")]
    pub config: PathBuf,

    /// Increase verbosity (-v verbose, -vv very verbose, -vvv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a backup file of the database in the backup directory
    #[command(
        name = "backup:sql",
        after_help = "The path to binary mysqldump on Mac OSX can be \"/Applications/MAMP/Library/bin/mysqldump\""
    )]
    BackupSql {
        /// The path to binary mysqldump
        #[arg(short, long, default_value = DEFAULT_DUMP_BINARY)]
        bin: String,

        /// Maximum number of seconds the dump may run
        #[arg(short, long, value_parser = parse_timeout)]
        timeout: Option<f64>,

        /// Write a plain .sql file instead of .sql.gz
        #[arg(long)]
        no_gzip: bool,

        /// Print the real password in the echoed command line
        #[arg(long)]
        show_password: bool,
    },
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_occurrences(self.verbose)
    }

    pub fn backup_request(&self) -> BackupRequest {
        match &self.command {
            Commands::BackupSql {
                bin,
                timeout,
                no_gzip,
                show_password,
            } => BackupRequest {
                binary: bin.clone(),
                timeout_seconds: *timeout,
                compression: !no_gzip,
                verbosity: self.verbosity(),
                reveal_password: *show_password,
            },
        }
    }
}

fn parse_timeout(value: &str) -> Result<f64, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(format!("timeout must be a positive number of seconds, got {}", value));
    }
    Ok(seconds)
}
