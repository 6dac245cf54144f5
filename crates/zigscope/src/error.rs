use std::io;
use std::path::Path;

use thiserror::Error;

/// Structured failure from [`crate::analyze_file`]'s filesystem read
/// (spec §6 "fails with a structured error (not-found,
/// permission-denied, io-error)").
#[derive(Debug, Error)]
pub enum AnalysisIoError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("failed to read {path}: {source}")]
    Io { path: String, #[source] source: io::Error },

    #[error(transparent)]
    Configuration(#[from] zigscope_settings::ConfigurationError),
}

impl AnalysisIoError {
    pub(crate) fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.display().to_string();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }
}
