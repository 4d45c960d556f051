//! Shared runtime state for torc-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The order service is
//! synchronous; handlers hop onto the blocking pool to call it.

use std::path::PathBuf;
use std::sync::Arc;

use torc_config::TorcConfig;
use torc_store::{FileMenu, MenuSource, OrderService, PopularityTracker, SessionStore};

/// Static build metadata included in health responses.
#[derive(Clone, Debug)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// Cloneable (Arc) handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub build: BuildInfo,
    pub orders: Arc<OrderService>,
    /// Order UI assets; `None` disables static serving.
    pub public_static_dir: Option<PathBuf>,
    /// Admin UI assets; `None` disables static serving.
    pub admin_static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(orders: OrderService) -> Self {
        Self {
            build: BuildInfo {
                service: "torc-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            orders: Arc::new(orders),
            public_static_dir: None,
            admin_static_dir: None,
        }
    }

    /// Wire the file-backed menu and stores named by `cfg`.
    pub fn from_config(cfg: &TorcConfig) -> Self {
        let menu: Arc<dyn MenuSource> = Arc::new(FileMenu::new(&cfg.menu.path));
        let orders = OrderService::new(
            menu,
            SessionStore::new(&cfg.storage.sessions_root),
            PopularityTracker::new(&cfg.storage.popular_path),
        );
        Self {
            public_static_dir: Some(cfg.public.static_dir.clone()),
            admin_static_dir: Some(cfg.admin.static_dir.clone()),
            ..Self::new(orders)
        }
    }
}
