//! Durable one-level namespace of sessions, one directory per session and
//! one file per order.
//!
//! Orders are never appended to a shared log: each is its own
//! `order-<orderId>.json`, written atomically, so concurrent appends to the
//! same session need no locking. The price is that [`SessionStore::read_all`]
//! must tolerate stray or damaged files, which it skips.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use torc_schemas::Order;
use tracing::{debug, warn};

use crate::atomic::write_atomic;
use crate::error::StorageError;

const ORDER_PREFIX: &str = "order-";
const ORDER_SUFFIX: &str = ".json";

/// `[A-Za-z0-9_-]+`. Excludes `/`, `\` and `.` so a valid name can never
/// escape the sessions root.
pub fn is_valid_session_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn validate_name(name: &str) -> bool {
        is_valid_session_name(name)
    }

    fn session_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_session_name(name) {
            return Err(StorageError::io(
                "resolve session",
                &self.root,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("invalid session name {name:?}"),
                ),
            ));
        }
        Ok(self.root.join(name))
    }

    /// Create the session directory if absent. Idempotent.
    pub fn ensure(&self, name: &str) -> Result<(), StorageError> {
        let path = self.session_path(name)?;
        fs::create_dir_all(&path).map_err(|e| StorageError::io("create session", &path, e))
    }

    /// True only for an existing directory; a plain file with the same name
    /// does not count.
    pub fn exists(&self, name: &str) -> bool {
        match self.session_path(name) {
            Ok(path) => path.is_dir(),
            Err(_) => false,
        }
    }

    /// Direct child directories of the root, in no particular order. An
    /// absent root is an empty list.
    pub fn list_all(&self) -> Result<Vec<String>, StorageError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io("list sessions", &self.root, e)),
        };

        let mut names = Vec::new();
        for entry in entries.flatten() {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Ensure the session exists, then write `order` as its own record.
    /// Returns the path written.
    pub fn append(&self, session: &str, order: &Order) -> Result<PathBuf, StorageError> {
        self.ensure(session)?;
        let dir = self.session_path(session)?;

        if !is_valid_session_name(&order.order_id) {
            return Err(StorageError::io(
                "write order",
                &dir,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("order id {:?} is not filename-safe", order.order_id),
                ),
            ));
        }

        let path = dir.join(format!("{ORDER_PREFIX}{}{ORDER_SUFFIX}", order.order_id));
        let body = serde_json::to_vec_pretty(order)
            .map_err(|e| StorageError::json("encode order", &path, e))?;
        write_atomic(&path, &body).map_err(|e| StorageError::io("write order", &path, e))?;

        debug!(session, order_id = %order.order_id, "order written");
        Ok(path)
    }

    /// All readable orders in the session, in directory order. Entries that
    /// do not look like order files, or fail to read or parse, are skipped.
    pub fn read_all(&self, session: &str) -> Result<Vec<Order>, StorageError> {
        let dir = self.session_path(session)?;
        let entries = fs::read_dir(&dir).map_err(|e| StorageError::io("read session", &dir, e))?;

        let mut orders = Vec::new();
        for entry in entries.flatten() {
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(true) {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.starts_with(ORDER_PREFIX) || !name.ends_with(ORDER_SUFFIX) {
                continue;
            }

            let path = entry.path();
            let raw = match fs::read(&path) {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping unreadable order file");
                    continue;
                }
            };
            match serde_json::from_slice::<Order>(&raw) {
                Ok(order) => orders.push(order),
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping corrupt order file");
                }
            }
        }
        Ok(orders)
    }
}
