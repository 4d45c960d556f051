//! torc-daemon entry point.
//!
//! This file is intentionally thin: it loads config, sets up tracing, builds
//! the shared state, wires middleware, and starts both HTTP surfaces. All
//! route handlers live in `routes.rs`; shared state lives in `state.rs`.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::Router;
use torc_config::{load_existing_layers, report_unused_keys, UnusedKeyPolicy};
use torc_daemon::{routes, state};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

/// Config layers read in order when `TORC_CONFIG` is unset; missing files are skipped.
const DEFAULT_CONFIG_LAYERS: &[&str] = &["torc.yaml", "torc.local.yaml"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let layers: Vec<String> = match std::env::var("TORC_CONFIG") {
        Ok(v) => v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect(),
        Err(_) => DEFAULT_CONFIG_LAYERS.iter().map(|s| s.to_string()).collect(),
    };
    let (loaded, used) = load_existing_layers(&layers[..]).context("load config")?;
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    if !report.is_clean() {
        warn!(keys = ?report.unused_leaf_pointers, "config has keys nothing reads");
    }

    let mut cfg = loaded.config;
    cfg.apply_env_overrides(|k| std::env::var(k).ok())?;
    info!(
        config_hash = %loaded.config_hash,
        layers = ?used,
        sessions_root = %cfg.storage.sessions_root.display(),
        popular_path = %cfg.storage.popular_path.display(),
        menu = %cfg.menu.path.display(),
        "config loaded"
    );

    // The active session always starts unset; an operator selects one after boot.
    let shared = Arc::new(state::AppState::from_config(&cfg));

    let public = with_layers(routes::build_public_router(Arc::clone(&shared)));
    let admin = with_layers(routes::build_admin_router(Arc::clone(&shared)));

    // Admin failure is logged but does not take the order surface down.
    let admin_addr = cfg.admin.addr;
    tokio::spawn(async move {
        if let Err(err) = serve("admin", admin_addr, admin).await {
            error!(%err, "admin server failed");
        }
    });

    serve("public", cfg.public.addr, public).await
}

async fn serve(name: &'static str, addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {name} listener on {addr}"))?;
    info!("{name} surface listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| format!("{name} server crashed"))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "ctrl-c handler failed; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

fn with_layers(router: Router) -> Router {
    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_localhost_only())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// CORS: allow only localhost origins (UI dev servers).
fn cors_localhost_only() -> CorsLayer {
    let allowed_origins = [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
        "http://localhost:8080",
        "http://127.0.0.1:8080",
        "http://localhost:9090",
        "http://127.0.0.1:9090",
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(tower_http::cors::Any)
}
