//! Scenario: menu edits from the CLI land in the file the daemon reads.
//!
//! Invariant: `torc menu add/remove/rename` rewrite the menu file in place,
//! matching names case-insensitively, and a refused edit leaves the file
//! untouched.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;

fn torc() -> Command {
    let mut cmd = Command::cargo_bin("torc").unwrap();
    cmd.env_remove("TORC_MENU_PATH");
    cmd
}

#[test]
fn add_remove_rename_round_trip_through_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let menu = dir.path().join("menu.txt");
    fs::write(&menu, "\"Latte\",\n\"Mocha\",\n").unwrap();
    let file = menu.to_str().unwrap();

    torc()
        .args(["menu", "add", "Chai", "--file", file])
        .assert()
        .success()
        .stdout(predicate::str::contains("3. Chai"));

    torc()
        .args(["menu", "remove", "mocha", "--file", file])
        .assert()
        .success();

    torc()
        .args(["menu", "rename", "LATTE", "Flat White", "--file", file])
        .assert()
        .success();

    let items = torc_store::parse_menu(&fs::read_to_string(&menu).unwrap());
    assert_eq!(items, vec!["Flat White", "Chai"]);
}

#[test]
fn duplicate_add_is_refused_and_file_is_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let menu = dir.path().join("menu.txt");
    fs::write(&menu, "\"Latte\",\n").unwrap();
    let before = fs::read_to_string(&menu).unwrap();

    torc()
        .args(["menu", "add", "latte", "--file", menu.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already on the menu"));

    assert_eq!(fs::read_to_string(&menu).unwrap(), before);
}

#[test]
fn show_on_missing_file_reports_empty_menu() {
    let dir = tempfile::tempdir().unwrap();
    let menu = dir.path().join("absent.txt");

    torc()
        .args(["menu", "show", "--file", menu.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("menu is empty"));
}

#[test]
fn menu_path_comes_from_layered_config() {
    let dir = tempfile::tempdir().unwrap();
    let menu = dir.path().join("drinks.txt");
    fs::write(&menu, "\"Espresso\",\n").unwrap();
    let cfg = dir.path().join("torc.yaml");
    fs::write(&cfg, format!("menu:\n  path: {}\n", menu.display())).unwrap();

    torc()
        .args(["menu", "show", "--config", cfg.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Espresso"));
}

#[test]
fn config_hash_prints_hash_line() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("torc.yaml");
    fs::write(&cfg, "public:\n  addr: 127.0.0.1:8081\n").unwrap();

    torc()
        .args(["config-hash", cfg.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("config_hash="))
        .stdout(predicate::str::contains("127.0.0.1:8081"));
}
