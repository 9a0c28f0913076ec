//! Fatal error kinds surfaced at the process boundary.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DockError {
    #[error("argument error: {0}")]
    Argument(String),

    #[error("filesystem error: {path}: {reason}")]
    Filesystem { path: PathBuf, reason: String },

    #[error("parse error at {path}:{line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
