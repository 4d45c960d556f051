//! Scenario: order submission rules.
//!
//! # Invariants under test
//!
//! - No active session: `NoActiveSession`, nothing written.
//! - Blank drink or customer: `Validation`.
//! - Off-menu drink: `NotOnMenu`; menu matching ignores case.
//! - Inputs are trimmed; the drink is stored as submitted.
//! - A failed order write fails the request and leaves popularity alone.
//! - Popularity failures never fail the order.
//! - Snapshot ordering: count desc, name asc.

use std::sync::Arc;

use torc_store::{OrderError, OrderService, PopularityTracker, SessionStore, StaticMenu};

fn service_at(dir: &std::path::Path, popular: std::path::PathBuf) -> OrderService {
    OrderService::new(
        Arc::new(StaticMenu::new(["Latte", "Mocha", "Espresso"])),
        SessionStore::new(dir.join("Sessions")),
        PopularityTracker::new(popular),
    )
}

#[test]
fn no_active_session_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service_at(dir.path(), dir.path().join("popular.json"));

    assert!(matches!(
        svc.submit_order("Latte", "Ada", ""),
        Err(OrderError::NoActiveSession)
    ));
    assert!(matches!(svc.list_orders(None), Err(OrderError::NoActiveSession)));
    assert!(!dir.path().join("Sessions").exists());
    assert!(!dir.path().join("popular.json").exists());
}

#[test]
fn blank_fields_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service_at(dir.path(), dir.path().join("popular.json"));
    svc.create_or_ensure_session("s1").unwrap();

    match svc.submit_order("   ", "Ada", "") {
        Err(OrderError::Validation(msg)) => assert_eq!(msg, "drink is required"),
        other => panic!("unexpected {other:?}"),
    }
    match svc.submit_order("Latte", "\t", "") {
        Err(OrderError::Validation(msg)) => assert_eq!(msg, "customerName is required"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(svc.list_orders(None).unwrap().orders.is_empty());
}

#[test]
fn menu_check_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service_at(dir.path(), dir.path().join("popular.json"));
    svc.create_or_ensure_session("s1").unwrap();

    assert!(matches!(
        svc.submit_order("Unicorn Frappe", "Ada", ""),
        Err(OrderError::NotOnMenu(d)) if d == "Unicorn Frappe"
    ));

    let order = svc.submit_order("  latte ", " Ada ", "  oat milk ").unwrap();
    assert_eq!(order.drink, "latte");
    assert_eq!(order.customer_name, "Ada");
    assert_eq!(order.instructions, "oat milk");
    assert!(!order.order_id.is_empty());

    let listed = svc.list_orders(None).unwrap();
    assert_eq!(listed.session_name, "s1");
    assert_eq!(listed.orders, vec![order]);
}

#[test]
fn popularity_failure_does_not_fail_the_order() {
    let dir = tempfile::tempdir().unwrap();
    // a directory where the popularity file should be: every read fails
    let popular = dir.path().join("popular.json");
    std::fs::create_dir(&popular).unwrap();

    let svc = service_at(dir.path(), popular);
    svc.create_or_ensure_session("s1").unwrap();

    let order = svc.submit_order("Mocha", "Lin", "").unwrap();
    assert_eq!(svc.list_orders(None).unwrap().orders, vec![order]);
    assert!(matches!(svc.popularity_snapshot(), Err(OrderError::Storage(_))));
}

#[test]
fn failed_order_write_is_fatal_and_counts_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service_at(dir.path(), dir.path().join("popular.json"));
    svc.create_or_ensure_session("s").unwrap();

    // a plain file where the session directory should be
    let session_dir = dir.path().join("Sessions").join("s");
    std::fs::remove_dir(&session_dir).unwrap();
    std::fs::write(&session_dir, b"not a directory").unwrap();

    assert!(matches!(
        svc.submit_order("Latte", "Ada", ""),
        Err(OrderError::Storage(_))
    ));
    assert!(!dir.path().join("popular.json").exists());
}

#[test]
fn snapshot_orders_by_count_then_name() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service_at(dir.path(), dir.path().join("popular.json"));
    svc.create_or_ensure_session("s1").unwrap();

    for (drink, n) in [("Latte", 3), ("Mocha", 5), ("Espresso", 5)] {
        for _ in 0..n {
            svc.submit_order(drink, "x", "").unwrap();
        }
    }

    let snap: Vec<(String, u64)> = svc
        .popularity_snapshot()
        .unwrap()
        .into_iter()
        .map(|i| (i.drink, i.count))
        .collect();
    assert_eq!(
        snap,
        vec![
            ("Espresso".to_string(), 5),
            ("Mocha".to_string(), 5),
            ("Latte".to_string(), 3)
        ]
    );
}

#[test]
fn explicit_session_override_is_validated() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service_at(dir.path(), dir.path().join("popular.json"));
    svc.create_or_ensure_session("s1").unwrap();
    svc.submit_order("Latte", "Ada", "").unwrap();
    svc.create_or_ensure_session("s2").unwrap();

    assert!(matches!(
        svc.list_orders(Some("../s1")),
        Err(OrderError::Validation(_))
    ));
    assert_eq!(svc.list_orders(Some("s1")).unwrap().orders.len(), 1);
    // blank override falls back to the active session
    assert_eq!(svc.list_orders(Some("  ")).unwrap().session_name, "s2");
}
