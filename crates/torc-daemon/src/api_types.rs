//! Daemon-only response types. Bodies shared with the CLI live in
//! `torc-schemas`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
    /// Empty when no session is selected.
    pub active_session: String,
}

/// `?sessionName=` on `GET /api/orders`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrdersQuery {
    #[serde(rename = "sessionName")]
    pub session_name: Option<String>,
}
