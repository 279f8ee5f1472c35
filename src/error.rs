//! Error taxonomy for the extraction pipeline.
//!
//! Only container-level faults surface here. A record whose envelope does not
//! decode is not an error: the decoder returns `None` and the record is skipped.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot could not be opened: missing, unreadable, locked or not a bbolt file.
    #[error("failed to open snapshot file {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    /// The container structure broke mid-traversal (bad page reference, truncated page, ...).
    #[error("failed to read snapshot: {reason}")]
    Read { reason: String },

    /// Rendering the in-memory result failed. Not expected for well-formed data.
    #[error("failed to marshal JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SnapshotError {
    pub fn open(path: &Path, reason: impl Into<String>) -> Self {
        SnapshotError::Open {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn read(reason: impl Into<String>) -> Self {
        SnapshotError::Read {
            reason: reason.into(),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, SnapshotError::Open { .. })
    }

    pub fn is_read(&self) -> bool {
        matches!(self, SnapshotError::Read { .. })
    }
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
