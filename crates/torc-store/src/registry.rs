use std::sync::{PoisonError, RwLock};

/// Process-wide "currently selected session" pointer.
///
/// Starts empty on every boot; the selection is intentionally not persisted.
#[derive(Debug, Default)]
pub struct ActiveSessionRegistry {
    current: RwLock<String>,
}

impl ActiveSessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty string when nothing has been selected.
    pub fn get(&self) -> String {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn current(&self) -> Option<String> {
        let name = self.get();
        (!name.is_empty()).then_some(name)
    }

    pub fn set(&self, name: impl Into<String>) {
        let name = name.into();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = name;
    }
}
