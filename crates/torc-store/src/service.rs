//! Order-taking orchestration over the menu, session store, popularity
//! tracker and active-session registry.
//!
//! One `OrderService` is built at startup and shared (behind `Arc`) by every
//! request handler; it owns no async machinery.

use std::sync::Arc;

use chrono::Utc;
use torc_schemas::{Order, PopularItem};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::OrderError;
use crate::menu::MenuSource;
use crate::popularity::PopularityTracker;
use crate::registry::ActiveSessionRegistry;
use crate::session_store::{is_valid_session_name, SessionStore};

/// Orders of one session, tagged with the session they were read from.
#[derive(Debug, Clone)]
pub struct SessionOrders {
    pub session_name: String,
    pub orders: Vec<Order>,
}

pub struct OrderService {
    menu: Arc<dyn MenuSource>,
    sessions: SessionStore,
    popularity: PopularityTracker,
    active: ActiveSessionRegistry,
}

impl OrderService {
    /// Boots with no active session.
    pub fn new(
        menu: Arc<dyn MenuSource>,
        sessions: SessionStore,
        popularity: PopularityTracker,
    ) -> Self {
        Self {
            menu,
            sessions,
            popularity,
            active: ActiveSessionRegistry::new(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn popularity(&self) -> &PopularityTracker {
        &self.popularity
    }

    pub fn menu(&self) -> Vec<String> {
        self.menu.current_menu()
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    /// Create the session if needed and make it active. Returns the
    /// normalised (trimmed) name.
    pub fn create_or_ensure_session(&self, raw_name: &str) -> Result<String, OrderError> {
        let name = checked_session_name(raw_name)?;
        self.sessions.ensure(&name)?;
        self.active.set(name.clone());
        info!(session = %name, "session created/selected");
        Ok(name)
    }

    /// Make an existing session active.
    pub fn switch_session(&self, raw_name: &str) -> Result<String, OrderError> {
        let name = checked_session_name(raw_name)?;
        if !self.sessions.exists(&name) {
            return Err(OrderError::NotFound(name));
        }
        self.active.set(name.clone());
        info!(session = %name, "session switched");
        Ok(name)
    }

    /// Empty when no session is selected.
    pub fn active_session(&self) -> String {
        self.active.get()
    }

    /// Every session on disk, sorted by name.
    pub fn list_sessions(&self) -> Result<Vec<String>, OrderError> {
        let mut names = self.sessions.list_all()?;
        names.sort();
        Ok(names)
    }

    // -----------------------------------------------------------------------
    // Orders
    // -----------------------------------------------------------------------

    /// Validate and record a new order in the active session.
    ///
    /// The order is durable once this returns `Ok`. A failure to bump the
    /// popularity count afterwards is logged and otherwise ignored.
    pub fn submit_order(
        &self,
        drink: &str,
        customer_name: &str,
        instructions: &str,
    ) -> Result<Order, OrderError> {
        let session = self.active.current().ok_or(OrderError::NoActiveSession)?;

        let drink = drink.trim();
        if drink.is_empty() {
            return Err(OrderError::Validation("drink is required".to_string()));
        }
        let customer_name = customer_name.trim();
        if customer_name.is_empty() {
            return Err(OrderError::Validation("customerName is required".to_string()));
        }
        if !self.menu.drink_on_menu(drink) {
            return Err(OrderError::NotOnMenu(drink.to_string()));
        }

        let order = Order {
            order_id: Uuid::new_v4().simple().to_string(),
            drink: drink.to_string(),
            customer_name: customer_name.to_string(),
            instructions: instructions.trim().to_string(),
            timestamp: Utc::now(),
        };

        self.sessions.append(&session, &order)?;
        info!(session = %session, order_id = %order.order_id, drink = %order.drink, "order recorded");

        if let Err(err) = self.popularity.increment(&order.drink) {
            warn!(drink = %order.drink, %err, "failed to update popular stats");
        }

        Ok(order)
    }

    /// Orders of `session_override`, or of the active session when `None`
    /// (or blank). Directory order; sort by `timestamp` if creation order
    /// matters.
    pub fn list_orders(&self, session_override: Option<&str>) -> Result<SessionOrders, OrderError> {
        let session_name = match session_override.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => checked_session_name(name)?,
            None => self.active.current().ok_or(OrderError::NoActiveSession)?,
        };
        let orders = self.sessions.read_all(&session_name)?;
        Ok(SessionOrders {
            session_name,
            orders,
        })
    }

    // -----------------------------------------------------------------------
    // Popularity
    // -----------------------------------------------------------------------

    pub fn popularity_snapshot(&self) -> Result<Vec<PopularItem>, OrderError> {
        Ok(self.popularity.snapshot()?)
    }
}

fn checked_session_name(raw: &str) -> Result<String, OrderError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(OrderError::Validation("sessionName is required".to_string()));
    }
    if !is_valid_session_name(name) {
        return Err(OrderError::Validation("invalid sessionName".to_string()));
    }
    Ok(name.to_string())
}
