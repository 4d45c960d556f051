//! `torc status`: one-shot summary from a running daemon's admin surface.

use anyhow::{Context, Result};
use torc_schemas::{PopularResponse, SessionsResponse};
use tracing::debug;

pub fn run(admin_url: &str, top: usize) -> Result<()> {
    let base = admin_url.trim_end_matches('/');
    let client = reqwest::blocking::Client::new();

    let sessions: SessionsResponse = fetch(&client, &format!("{base}/api/sessions"))?;
    let popular: PopularResponse = fetch(&client, &format!("{base}/api/popular"))?;

    let active = if sessions.selected_session.is_empty() {
        "(none)"
    } else {
        sessions.selected_session.as_str()
    };
    println!("admin_url={base}");
    println!("active_session={active}");
    println!("sessions={}", sessions.sessions.len());
    for name in &sessions.sessions {
        println!("  - {name}");
    }
    println!("popular:");
    if popular.items.is_empty() {
        println!("  (no orders yet)");
    }
    for item in popular.items.iter().take(top) {
        println!("  {:>5}  {}", item.count, item.drink);
    }
    Ok(())
}

fn fetch<T: serde::de::DeserializeOwned>(client: &reqwest::blocking::Client, url: &str) -> Result<T> {
    debug!(url, "GET");
    client
        .get(url)
        .send()
        .with_context(|| format!("daemon unreachable at {url}"))?
        .error_for_status()
        .with_context(|| format!("daemon refused {url}"))?
        .json()
        .with_context(|| format!("unexpected response from {url}"))
}
