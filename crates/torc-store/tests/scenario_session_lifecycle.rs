//! Scenario: session namespace lifecycle.
//!
//! # Invariants under test
//!
//! - `ensure` then `exists` is true for every valid name; `ensure` twice is a
//!   no-op that keeps existing orders.
//! - Names outside `[A-Za-z0-9_-]+` are rejected by create and switch with
//!   `Validation` and nothing is created on disk.
//! - Switching to a never-created session is `NotFound`; after create it works.
//! - A plain file is not a session.

use std::sync::Arc;

use torc_store::{OrderError, OrderService, PopularityTracker, SessionStore, StaticMenu};

fn service(dir: &std::path::Path) -> OrderService {
    OrderService::new(
        Arc::new(StaticMenu::new(["Latte", "Mocha"])),
        SessionStore::new(dir.join("Sessions")),
        PopularityTracker::new(dir.join("popular.json")),
    )
}

#[test]
fn ensure_is_idempotent_and_preserves_orders() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());

    for name in ["a", "Morning-Shift", "event_2025", "-_-"] {
        svc.sessions().ensure(name).unwrap();
        assert!(svc.sessions().exists(name), "{name} should exist");
    }

    svc.create_or_ensure_session("gala").unwrap();
    let order = svc.submit_order("Latte", "Ada", "").unwrap();

    svc.create_or_ensure_session("gala").unwrap();
    let listed = svc.list_orders(None).unwrap();
    assert_eq!(listed.orders, vec![order]);

    let sessions = svc.list_sessions().unwrap();
    assert_eq!(sessions.iter().filter(|s| *s == "gala").count(), 1);
}

#[test]
fn invalid_names_are_validation_errors() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());

    for bad in ["a/b", "a.b", "", "   ", "../etc", "a b"] {
        assert!(!SessionStore::validate_name(bad.trim()));
        assert!(
            matches!(svc.create_or_ensure_session(bad), Err(OrderError::Validation(_))),
            "create {bad:?}"
        );
        assert!(
            matches!(svc.switch_session(bad), Err(OrderError::Validation(_))),
            "switch {bad:?}"
        );
    }

    assert!(svc.list_sessions().unwrap().is_empty());
    assert_eq!(svc.active_session(), "");
}

#[test]
fn switch_requires_existing_session() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());

    match svc.switch_session("late-shift") {
        Err(OrderError::NotFound(name)) => assert_eq!(name, "late-shift"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(svc.active_session(), "");

    svc.create_or_ensure_session("late-shift").unwrap();
    svc.create_or_ensure_session("early-shift").unwrap();
    assert_eq!(svc.active_session(), "early-shift");

    assert_eq!(svc.switch_session("  late-shift ").unwrap(), "late-shift");
    assert_eq!(svc.active_session(), "late-shift");
}

#[test]
fn plain_file_is_not_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("Sessions");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("impostor"), b"not a dir").unwrap();

    let store = SessionStore::new(&root);
    assert!(!store.exists("impostor"));
    assert!(store.list_all().unwrap().is_empty());

    let svc = service(dir.path());
    assert!(matches!(svc.switch_session("impostor"), Err(OrderError::NotFound(_))));
}
