// sqlbackup/src/backup/archive.rs
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::{AppError, Result};

/// Destination for the dump tool's standard output.
///
/// Either the raw SQL stream written straight to the artifact file, or the same
/// stream gzip-compressed in process (the equivalent of `| gzip > artifact`).
pub enum ArtifactWriter {
    Plain {
        path: PathBuf,
        inner: BufWriter<File>,
    },
    Gzip {
        path: PathBuf,
        inner: GzEncoder<BufWriter<File>>,
    },
}

impl ArtifactWriter {
    /// Creates (or truncates) the artifact file. An existing file of the same name is overwritten.
    pub fn create(path: &Path, compressed: bool) -> Result<Self> {
        let file = File::create(path).map_err(|e| AppError::io(path, e))?;
        let inner = BufWriter::new(file);
        Ok(if compressed {
            ArtifactWriter::Gzip {
                path: path.to_path_buf(),
                inner: GzEncoder::new(inner, Compression::default()),
            }
        } else {
            ArtifactWriter::Plain {
                path: path.to_path_buf(),
                inner,
            }
        })
    }

    pub fn path(&self) -> &Path {
        match self {
            ArtifactWriter::Plain { path, .. } | ArtifactWriter::Gzip { path, .. } => path,
        }
    }

    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        let result = match self {
            ArtifactWriter::Plain { inner, .. } => inner.write_all(chunk),
            ArtifactWriter::Gzip { inner, .. } => inner.write_all(chunk),
        };
        result.map_err(|e| AppError::io(self.path(), e))
    }

    /// Flushes buffered data and, for gzip, writes the stream trailer.
    pub fn finish(self) -> Result<()> {
        match self {
            ArtifactWriter::Plain { path, mut inner } => {
                inner.flush().map_err(|e| AppError::io(&path, e))
            }
            ArtifactWriter::Gzip { path, inner } => {
                let mut buffered = inner.finish().map_err(|e| AppError::io(&path, e))?;
                buffered.flush().map_err(|e| AppError::io(&path, e))
            }
        }
    }
}
