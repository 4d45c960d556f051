//! Global drink popularity counter persisted as a single JSON record.
//!
//! The whole record is rewritten on every increment, so one mutex is held
//! across load, mutate and store. Per-key locking would not help: the unit
//! of persistence is the file.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use torc_schemas::{PopularItem, PopularStats};
use tracing::warn;

use crate::atomic::write_atomic;
use crate::error::StorageError;

#[derive(Debug)]
pub struct PopularityTracker {
    path: PathBuf,
    lock: Mutex<()>,
}

enum Loaded {
    Missing,
    Valid(PopularStats),
    Corrupt(serde_json::Error),
}

impl PopularityTracker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // The guarded state lives on disk, so a panic mid-update leaves nothing
    // in memory to distrust.
    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> Result<Loaded, StorageError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Loaded::Missing),
            Err(e) => return Err(StorageError::io("read popularity", &self.path, e)),
        };
        Ok(match serde_json::from_slice::<PopularStats>(&raw) {
            Ok(stats) => Loaded::Valid(stats),
            Err(e) => Loaded::Corrupt(e),
        })
    }

    /// Move an unparseable record aside so a fresh one can be started
    /// without destroying the old bytes.
    fn quarantine(&self) -> Result<PathBuf, StorageError> {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "popular.json".to_string());
        let aside = self
            .path
            .with_file_name(format!("{file_name}.corrupt-{}", Utc::now().timestamp_millis()));
        fs::rename(&self.path, &aside)
            .map_err(|e| StorageError::io("quarantine popularity", &self.path, e))?;
        Ok(aside)
    }

    /// Add one to `drink`'s count and persist. Returns the new count.
    pub fn increment(&self, drink: &str) -> Result<u64, StorageError> {
        let _guard = self.guard();

        let mut stats = match self.load()? {
            Loaded::Missing => PopularStats::default(),
            Loaded::Valid(stats) => stats,
            Loaded::Corrupt(err) => {
                let aside = self.quarantine()?;
                warn!(
                    path = %self.path.display(),
                    moved_to = %aside.display(),
                    %err,
                    "popularity record corrupt; starting from empty"
                );
                PopularStats::default()
            }
        };

        let count = stats.counts.entry(drink.to_string()).or_insert(0);
        let new_count = count.checked_add(1).ok_or_else(|| {
            StorageError::io(
                "increment popularity",
                &self.path,
                io::Error::new(io::ErrorKind::InvalidData, format!("count for {drink:?} overflows")),
            )
        })?;
        *count = new_count;

        let body = serde_json::to_vec_pretty(&stats)
            .map_err(|e| StorageError::json("encode popularity", &self.path, e))?;
        write_atomic(&self.path, &body)
            .map_err(|e| StorageError::io("write popularity", &self.path, e))?;

        Ok(new_count)
    }

    /// Current counts, most popular first, ties by name.
    pub fn snapshot(&self) -> Result<Vec<PopularItem>, StorageError> {
        let _guard = self.guard();

        let stats = match self.load()? {
            Loaded::Missing => PopularStats::default(),
            Loaded::Valid(stats) => stats,
            Loaded::Corrupt(err) => {
                warn!(path = %self.path.display(), %err, "popularity record corrupt; reporting empty");
                PopularStats::default()
            }
        };
        Ok(rank_counts(&stats.counts))
    }
}

/// Descending count, then ascending drink name.
pub fn rank_counts(counts: &BTreeMap<String, u64>) -> Vec<PopularItem> {
    let mut items: Vec<PopularItem> = counts
        .iter()
        .map(|(drink, &count)| PopularItem {
            drink: drink.clone(),
            count,
        })
        .collect();
    items.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.drink.cmp(&b.drink)));
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(drink: &str, count: u64) -> PopularItem {
        PopularItem {
            drink: drink.to_string(),
            count,
        }
    }

    #[test]
    fn ranking_breaks_ties_by_name() {
        let counts: BTreeMap<String, u64> = [("Latte", 3), ("Mocha", 5), ("Espresso", 5)]
            .into_iter()
            .map(|(d, c)| (d.to_string(), c))
            .collect();
        assert_eq!(
            rank_counts(&counts),
            vec![item("Espresso", 5), item("Mocha", 5), item("Latte", 3)]
        );
    }

    #[test]
    fn missing_record_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = PopularityTracker::new(dir.path().join("popular.json"));
        assert!(tracker.snapshot().unwrap().is_empty());
    }

    #[test]
    fn saturated_count_is_an_error_and_record_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("popular.json");
        let raw = format!(r#"{{"counts":{{"Latte":{}}}}}"#, u64::MAX);
        fs::write(&path, &raw).unwrap();
        let tracker = PopularityTracker::new(&path);

        let err = tracker.increment("Latte").unwrap_err();
        assert_eq!(err.io_kind(), Some(io::ErrorKind::InvalidData));
        assert_eq!(fs::read_to_string(&path).unwrap(), raw);
        assert_eq!(tracker.snapshot().unwrap(), vec![item("Latte", u64::MAX)]);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = PopularityTracker::new(dir.path().join("popular.json"));
        tracker.increment("Latte").unwrap();
        tracker.increment("latte").unwrap();
        assert_eq!(tracker.increment("Latte").unwrap(), 2);
        assert_eq!(
            tracker.snapshot().unwrap(),
            vec![item("Latte", 2), item("latte", 1)]
        );
    }
}
