use crate::app::vdf::DecodeError;
use std::path::PathBuf;
use thiserror::Error;

/// Recoverable failures raised while reading Steam's files. The scanner
/// turns every one of these into a warning at its stage boundary.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("{} is not found", .0.display())]
    NotFound(PathBuf),

    #[error("invalid format in {}: {reason}", .path.display())]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    pub fn invalid_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ScanError::InvalidFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
