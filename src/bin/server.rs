//! Muza HTTP server binary.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 5000)
//! - `MUZA_BIND` — Bind address (default: 0.0.0.0)
//! - `MUZA_SEED` — Base seed for reproducible sessions
//! - `MUZA_PERSONALITY` — creative | analytical | empathic | chaotic
//! - `MUZA_SENDER` — Name the agent addresses (default: Кира)
//! - `MUZA_EMOTIONS` — YAML emotion table overriding the built-in one
//! - `MUZA_MAX_SESSIONS` — Open sessions kept before LRU eviction (default: 1000)
//! - `MUZA_SESSION_TTL` — Idle seconds before a session is pruned (default: 3600)
//! - `RUST_LOG` — Tracing filter (default: "info,muza=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use std::time::Duration;

use anyhow::Context;
use muza::config::ServerConfig;
use muza::server::{app_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,muza=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let bind_addr = config.socket_addr();
    if let Some(path) = &config.emotions {
        tracing::info!("Loading emotion table from {}", path.display());
    }

    let prune_every = Duration::from_secs((config.session_ttl_secs / 4).clamp(1, 300));
    let state = AppState::new(config)?;

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(prune_every);
        loop {
            ticker.tick().await;
            let pruned = sessions.prune_idle(chrono::Utc::now());
            if pruned > 0 {
                tracing::info!("pruned {} idle sessions, {} open", pruned, sessions.len());
            }
        }
    });

    let app = app_router(state);

    tracing::info!("muza server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /                — web page");
    tracing::info!("  GET  /health          — liveness probe");
    tracing::info!("  POST /analyze         — analyze text");
    tracing::info!("  *    /sessions/:id/*  — session stats, history, profile, mutate, meditate");

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
