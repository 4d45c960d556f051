//! Persisted and wire-level data types shared by the store, the daemon and
//! the `torc` CLI.
//!
//! Field names are camelCase on the wire to stay compatible with the order
//! and admin UIs and with order files already on disk.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// One drink order. Immutable once written; owned by exactly one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub drink: String,
    pub customer_name: String,
    pub instructions: String,
    /// RFC3339 UTC.
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Popularity
// ---------------------------------------------------------------------------

/// On-disk popularity record (`popular.json`). A missing or `null`
/// `counts` reads as an empty mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularStats {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub counts: BTreeMap<String, u64>,
}

fn null_as_empty<'de, D>(de: D) -> Result<BTreeMap<String, u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, u64>>::deserialize(de)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularItem {
    pub drink: String,
    pub count: u64,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /session/create` and `POST /session/switch` (public and admin).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionNameRequest {
    #[serde(default)]
    pub session_name: String,
}

/// Body of `POST /order`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub drink: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub instructions: String,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub session_name: String,
    /// "created" | "switched"
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSessionResponse {
    /// Empty when no session is selected.
    pub session_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuResponse {
    pub menu: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrdersResponse {
    pub session_name: String,
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsResponse {
    pub sessions: Vec<String>,
    pub selected_session: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularResponse {
    pub items: Vec<PopularItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn order_uses_camel_case_field_names() {
        let order = Order {
            order_id: "abc".to_string(),
            drink: "Latte".to_string(),
            customer_name: "Ada".to_string(),
            instructions: String::new(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
        };
        let v = serde_json::to_value(&order).unwrap();
        assert_eq!(v["orderId"], "abc");
        assert_eq!(v["customerName"], "Ada");
        assert_eq!(v["timestamp"], "2025-03-01T09:30:00Z");
    }

    #[test]
    fn order_parses_nanosecond_timestamps() {
        let raw = r#"{"orderId":"1","drink":"Mocha","customerName":"B",
            "instructions":"oat","timestamp":"2025-03-01T09:30:00.123456789Z"}"#;
        let order: Order = serde_json::from_str(raw).unwrap();
        assert_eq!(order.timestamp.timestamp(), 1_740_821_400);
    }

    #[test]
    fn popular_stats_tolerates_missing_counts() {
        let stats: PopularStats = serde_json::from_str("{}").unwrap();
        assert!(stats.counts.is_empty());
    }

    #[test]
    fn popular_stats_reads_null_counts_as_empty() {
        let stats: PopularStats = serde_json::from_str(r#"{"counts":null}"#).unwrap();
        assert!(stats.counts.is_empty());
    }

    #[test]
    fn missing_request_fields_default_to_empty() {
        let req: CreateOrderRequest = serde_json::from_str(r#"{"drink":"Latte"}"#).unwrap();
        assert_eq!(req.drink, "Latte");
        assert!(req.customer_name.is_empty());
        assert!(req.instructions.is_empty());
    }
}
