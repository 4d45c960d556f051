//! Error taxonomy for the order store.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Underlying durable-storage failure (read, write, enumerate, encode).
#[derive(Debug)]
pub struct StorageError {
    op: &'static str,
    path: PathBuf,
    source: StorageErrorSource,
}

#[derive(Debug)]
pub enum StorageErrorSource {
    Io(io::Error),
    Json(serde_json::Error),
}

impl StorageError {
    pub fn io(op: &'static str, path: impl AsRef<Path>, err: io::Error) -> Self {
        Self {
            op,
            path: path.as_ref().to_path_buf(),
            source: StorageErrorSource::Io(err),
        }
    }

    pub fn json(op: &'static str, path: impl AsRef<Path>, err: serde_json::Error) -> Self {
        Self {
            op,
            path: path.as_ref().to_path_buf(),
            source: StorageErrorSource::Json(err),
        }
    }

    /// Short verb phrase naming the failed step, e.g. `"write order"`.
    pub fn op(&self) -> &'static str {
        self.op
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Some` when the failure came from the filesystem.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match &self.source {
            StorageErrorSource::Io(e) => Some(e.kind()),
            StorageErrorSource::Json(_) => None,
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            StorageErrorSource::Io(e) => {
                write!(f, "{} {}: {e}", self.op, self.path.display())
            }
            StorageErrorSource::Json(e) => {
                write!(f, "{} {}: invalid json: {e}", self.op, self.path.display())
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.source {
            StorageErrorSource::Io(e) => Some(e),
            StorageErrorSource::Json(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// OrderError
// ---------------------------------------------------------------------------

/// Everything an [`crate::OrderService`] operation can fail with.
#[derive(Debug)]
pub enum OrderError {
    /// Bad or missing input; the message is safe to show to the client.
    Validation(String),
    /// The drink (as submitted) is not on the current menu.
    NotOnMenu(String),
    /// The operation needs a selected session and none is set.
    NoActiveSession,
    /// The named session does not exist.
    NotFound(String),
    Storage(StorageError),
}

impl OrderError {
    pub fn is_client_error(&self) -> bool {
        !matches!(self, OrderError::Storage(_))
    }
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::Validation(msg) => write!(f, "{msg}"),
            OrderError::NotOnMenu(_) => write!(f, "drink not on menu"),
            OrderError::NoActiveSession => write!(f, "no session selected"),
            OrderError::NotFound(_) => write!(f, "session does not exist"),
            OrderError::Storage(e) => write!(f, "storage error: {e}"),
        }
    }
}

impl std::error::Error for OrderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrderError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for OrderError {
    fn from(e: StorageError) -> Self {
        OrderError::Storage(e)
    }
}
