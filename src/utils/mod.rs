pub mod output;

use std::path::PathBuf;
use which::which;

use crate::errors::{AppError, Result};

/// Resolves the dump binary, either a bare name looked up in PATH or an explicit path.
pub fn find_dump_executable(bin: &str) -> Result<PathBuf> {
    which(bin).map_err(|e| {
        AppError::Launch(format!(
            "{} executable not found ({}). Please ensure the MySQL client tools are installed and in your PATH, or pass --bin.",
            bin, e
        ))
    })
}
