mod logic;
pub(crate) mod archive; // Artifact writer, plain or gzip
pub(crate) mod db_dump; // Dump command construction and execution

pub use logic::BackupArtifact;

use crate::config::{AppConfig, BackupRequest};
use crate::errors::Result;
use crate::utils::output::OutputSink;

/// Public entry point for the `backup:sql` command.
pub async fn run_backup_flow(
    app_config: &AppConfig,
    request: &BackupRequest,
    sink: &mut dyn OutputSink,
) -> Result<BackupArtifact> {
    logic::perform_backup(&app_config.connection, &app_config.backup_dir, request, sink).await
}
