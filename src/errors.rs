use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dump process timed out after {seconds} seconds and was killed")]
    Timeout { seconds: f64 },

    // `None` when the process was terminated by a signal.
    #[error("Dump process failed with exit code {}", .code.map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string()))]
    Subprocess { code: Option<i32> },

    #[error("Failed to launch dump process: {0}")]
    Launch(String),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code the command should finish with.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Subprocess { code: Some(c) } if (1..=255).contains(c) => *c as u8,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
