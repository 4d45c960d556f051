//! Session-scoped order store and global popularity counter.
//!
//! Everything in this crate is synchronous blocking file I/O and is safe to
//! call from many threads at once. Async callers (the daemon) run these
//! calls on a blocking pool.
//!
//! Layout on disk:
//!
//! ```text
//! <sessions_root>/<session>/order-<orderId>.json   one file per order
//! <popular_path>                                   {"counts": {<drink>: n}}
//! ```

pub mod error;
pub mod menu;
pub mod popularity;
pub mod registry;
pub mod service;
pub mod session_store;

mod atomic;

pub use error::{OrderError, StorageError, StorageErrorSource};
pub use menu::{drink_on_menu, parse_menu, render_menu, FileMenu, MenuSource, StaticMenu};
pub use popularity::{rank_counts, PopularityTracker};
pub use registry::ActiveSessionRegistry;
pub use service::{OrderService, SessionOrders};
pub use session_store::{is_valid_session_name, SessionStore};
