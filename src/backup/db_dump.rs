// sqlbackup/src/backup/db_dump.rs
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{ChildStderr, ChildStdout, Command};
use tracing::{debug, warn};

use crate::backup::archive::ArtifactWriter;
use crate::config::ConnectionDescriptor;
use crate::errors::{AppError, Result};
use crate::utils::find_dump_executable;
use crate::utils::output::{OutputSink, Verbosity};

const READ_CHUNK_SIZE: usize = 64 * 1024;
const MASKED_PASSWORD: &str = "****";

/// A dump tool invocation: the binary plus its argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpCommand {
    pub program: String,
    pub args: Vec<String>,
    password_index: Option<usize>,
}

impl DumpCommand {
    #[cfg(test)]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        DumpCommand {
            program: program.into(),
            args,
            password_index: None,
        }
    }

    /// Shell-equivalent rendering of the invocation, used for the transparency line
    /// printed before the dump starts.
    pub fn render(&self, artifact: &Path, compressed: bool, reveal_password: bool) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 5);
        parts.push(self.program.clone());
        for (i, arg) in self.args.iter().enumerate() {
            if Some(i) == self.password_index && !reveal_password {
                parts.push(format!("-p{}", MASKED_PASSWORD));
            } else {
                parts.push(arg.clone());
            }
        }
        if compressed {
            parts.push("| gzip".to_string());
        }
        parts.push(format!("> {}", artifact.display()));
        parts.join(" ")
    }
}

/// Builds `<bin> -h <host> -u <user> [-p<password>] [-P <port>] <database> [-v]`.
///
/// The password is glued to `-p` because mysqldump treats a separate token after
/// `-p` as the database name and prompts for the password instead. An empty password
/// drops the flag entirely; a bare `-p` would block on an interactive prompt.
pub fn build_command_line(
    binary: &str,
    connection: &ConnectionDescriptor,
    verbosity: Verbosity,
) -> DumpCommand {
    let mut args = vec![
        "-h".to_string(),
        connection.host.clone(),
        "-u".to_string(),
        connection.username.clone(),
    ];
    let mut password_index = None;
    if !connection.password.is_empty() {
        args.push(format!("-p{}", connection.password));
        password_index = Some(args.len() - 1);
    }

    if let Some(port) = connection.port {
        args.push("-P".to_string());
        args.push(port.to_string());
    }
    args.push(connection.database.clone());
    if verbosity >= Verbosity::VeryVerbose {
        args.push("-v".to_string());
    }

    DumpCommand {
        program: binary.to_string(),
        args,
        password_index,
    }
}

/// Runs the dump tool once, streaming its stdout into `writer` and its stderr into the sink.
///
/// Returns the exit status of a process that ran to completion; a process that outlives
/// `timeout_seconds` is killed and reported as [`AppError::Timeout`]. Whatever was written
/// to the artifact so far stays on disk in both cases.
pub async fn execute(
    command: &DumpCommand,
    writer: ArtifactWriter,
    timeout_seconds: Option<f64>,
    sink: &mut dyn OutputSink,
) -> Result<ExitStatus> {
    let limit = timeout_seconds
        .map(|seconds| {
            Duration::try_from_secs_f64(seconds)
                .map_err(|_| AppError::Config(format!("invalid timeout: {} seconds", seconds)))
        })
        .transpose()?;

    let program = find_dump_executable(&command.program)?;
    debug!(program = %program.display(), args = command.args.len(), "spawning dump process");

    let mut child = Command::new(&program)
        .args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| AppError::Launch(format!("{}: {}", program.display(), e)))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| AppError::Launch("dump process stdout was not captured".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| AppError::Launch("dump process stderr was not captured".to_string()))?;

    let started = Instant::now();
    let pump = async {
        let (copied, (), status) = tokio::join!(
            copy_to_artifact(stdout, writer),
            forward_stderr(stderr, &mut *sink),
            child.wait(),
        );
        let status = status
            .map_err(|e| AppError::Launch(format!("failed to wait for dump process: {}", e)))?;
        let bytes = copied?;
        Ok::<_, AppError>((status, bytes))
    };

    let outcome = match limit {
        Some(limit) => {
            let timed = tokio::time::timeout(limit, pump).await;
            match timed {
                Ok(outcome) => outcome,
                Err(_) => {
                    let seconds = limit.as_secs_f64();
                    warn!(seconds, "dump process exceeded its timeout, killing it");
                    if let Err(e) = child.kill().await {
                        warn!(error = %e, "failed to kill dump process");
                    }
                    return Err(AppError::Timeout { seconds });
                }
            }
        }
        None => pump.await,
    };

    let (status, bytes) = outcome?;
    debug!(?status, bytes, elapsed_ms = started.elapsed().as_millis() as u64, "dump process finished");
    Ok(status)
}

async fn copy_to_artifact(mut stdout: ChildStdout, mut writer: ArtifactWriter) -> Result<u64> {
    let mut buf = vec![0u8; READ_CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = stdout
            .read(&mut buf)
            .await
            .map_err(|e| AppError::io(writer.path(), e))?;
        if n == 0 {
            break;
        }
        writer.write_chunk(&buf[..n])?;
        total += n as u64;
    }
    writer.finish()?;
    Ok(total)
}

async fn forward_stderr(stderr: ChildStderr, sink: &mut dyn OutputSink) {
    let mut reader = BufReader::new(stderr);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&line);
                sink.error(text.trim_end_matches(['\r', '\n']));
            }
            Err(e) => {
                warn!(error = %e, "failed to read dump process stderr");
                break;
            }
        }
    }
}
