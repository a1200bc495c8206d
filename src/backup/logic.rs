// sqlbackup/src/backup/logic.rs
use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tracing::{debug, info};

use crate::backup::archive::ArtifactWriter;
use crate::backup::db_dump::{build_command_line, execute};
use crate::config::{BackupRequest, ConnectionDescriptor, SUPPORTED_DRIVER};
use crate::errors::{AppError, Result};
use crate::utils::output::{OutputSink, Verbosity};

const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
const DUMP_SUFFIX: &str = ".sql";
const GZIP_SUFFIX: &str = ".gz";

/// The file produced by one backup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupArtifact {
    pub path: PathBuf,
    pub compressed: bool,
}

/// Fails before any side effect if the connection is not a MySQL one.
pub fn validate_driver(connection: &ConnectionDescriptor) -> Result<()> {
    if connection.driver != SUPPORTED_DRIVER {
        return Err(AppError::Config(format!(
            "unsupported driver '{}', the driver must be '{}'",
            connection.driver, SUPPORTED_DRIVER
        )));
    }
    Ok(())
}

/// Creates the backup directory (and parents) unless it already exists.
pub fn ensure_backup_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    debug!(path = %path.display(), "creating backup directory");
    fs::create_dir_all(path).map_err(|e| AppError::io(path, e))
}

/// `<dir>/<YYYYMMDD-HHMMSS>.sql[.gz]`. No collision check: a same-second rerun overwrites.
pub fn compute_artifact_path(dir: &Path, now: &NaiveDateTime, compressed: bool) -> PathBuf {
    let mut filename = format!("{}{}", now.format(TIMESTAMP_FORMAT), DUMP_SUFFIX);
    if compressed {
        filename.push_str(GZIP_SUFFIX);
    }
    dir.join(filename)
}

/// Turns the dump exit status into the run's result.
///
/// On success with an uncompressed artifact at debug verbosity, the whole dump is echoed
/// to the sink. A failed dump leaves its artifact untouched.
pub fn report_outcome(
    status: ExitStatus,
    artifact: &BackupArtifact,
    verbosity: Verbosity,
    sink: &mut dyn OutputSink,
) -> Result<()> {
    if !status.success() {
        return Err(AppError::Subprocess {
            code: status.code(),
        });
    }

    if !artifact.compressed && verbosity >= Verbosity::Debug {
        let contents = fs::read(&artifact.path).map_err(|e| AppError::io(&artifact.path, e))?;
        sink.info(&String::from_utf8_lossy(&contents));
    }
    Ok(())
}

/// Runs one backup, stamping the artifact with the current local time.
pub async fn perform_backup(
    connection: &ConnectionDescriptor,
    backup_dir: &Path,
    request: &BackupRequest,
    sink: &mut dyn OutputSink,
) -> Result<BackupArtifact> {
    perform_backup_at(connection, backup_dir, request, Local::now().naive_local(), sink).await
}

/// validate -> prepare directory -> compute path -> build command -> execute -> report.
pub async fn perform_backup_at(
    connection: &ConnectionDescriptor,
    backup_dir: &Path,
    request: &BackupRequest,
    now: NaiveDateTime,
    sink: &mut dyn OutputSink,
) -> Result<BackupArtifact> {
    validate_driver(connection)?;
    ensure_backup_directory(backup_dir)?;

    let artifact = BackupArtifact {
        path: compute_artifact_path(backup_dir, &now, request.compression),
        compressed: request.compression,
    };
    if request.verbosity >= Verbosity::Verbose {
        sink.info(&format!("Backing up '{}' to {}", connection.database, artifact.path.display()));
    }

    let command = build_command_line(&request.binary, connection, request.verbosity);
    sink.line(&command.render(&artifact.path, artifact.compressed, request.reveal_password));

    let writer = ArtifactWriter::create(&artifact.path, artifact.compressed)?;
    let status = execute(&command, writer, request.timeout_seconds, sink).await?;
    report_outcome(status, &artifact, request.verbosity, sink)?;

    info!(path = %artifact.path.display(), compressed = artifact.compressed, "backup written");
    Ok(artifact)
}
