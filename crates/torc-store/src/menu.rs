//! Menu source: the list of drinks orders are validated against.
//!
//! The menu file holds one item per line. Each line is trimmed, a trailing
//! `,` and surrounding `"` are stripped, and blank lines are skipped, so a
//! hand-pasted JSON array body works as well as a plain list.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::atomic::write_atomic;

/// Source of the current menu. Implementations must be cheap enough to call
/// once per order submission.
pub trait MenuSource: Send + Sync {
    /// Canonical (case-preserving) drink names.
    fn current_menu(&self) -> Vec<String>;

    fn drink_on_menu(&self, drink: &str) -> bool {
        drink_on_menu(&self.current_menu(), drink)
    }
}

/// Case-insensitive membership test.
pub fn drink_on_menu(menu: &[String], drink: &str) -> bool {
    menu.iter().any(|item| eq_fold(item, drink))
}

/// Char-by-char case folding: two chars match when equal, or when their
/// lowercase or uppercase mappings agree. Catches pairs whole-string
/// lowercasing misses (`K` Kelvin sign vs `k`, long `ſ` vs `s`).
fn eq_fold(a: &str, b: &str) -> bool {
    let mut bs = b.chars();
    for ca in a.chars() {
        let Some(cb) = bs.next() else {
            return false;
        };
        if ca != cb
            && !ca.to_lowercase().eq(cb.to_lowercase())
            && !ca.to_uppercase().eq(cb.to_uppercase())
        {
            return false;
        }
    }
    bs.next().is_none()
}

pub fn parse_menu(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_suffix(',').unwrap_or(line);
            line.trim_matches('"').to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

/// Inverse of [`parse_menu`] for well-formed item names.
pub fn render_menu(items: &[String]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(item);
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// FileMenu
// ---------------------------------------------------------------------------

/// Menu backed by a text file, re-read on every call so edits apply live.
#[derive(Debug, Clone)]
pub struct FileMenu {
    path: PathBuf,
}

impl FileMenu {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> io::Result<Vec<String>> {
        Ok(parse_menu(&fs::read_to_string(&self.path)?))
    }

    pub fn save(&self, items: &[String]) -> io::Result<()> {
        write_atomic(&self.path, render_menu(items).as_bytes())
    }
}

impl MenuSource for FileMenu {
    fn current_menu(&self) -> Vec<String> {
        match self.load() {
            Ok(items) => items,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "menu unreadable; serving empty menu");
                Vec::new()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// StaticMenu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct StaticMenu {
    items: Vec<String>,
}

impl StaticMenu {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

impl MenuSource for StaticMenu {
    fn current_menu(&self) -> Vec<String> {
        self.items.clone()
    }
}
