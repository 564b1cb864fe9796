mod config;
mod db;
mod errors;
mod identity;
mod leaderboard;
mod moderation;
mod models;
mod notify;
mod predictions;
mod roles;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::notify::{NoopNotifier, TakedownNotifier, WebhookNotifier};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Trust & Scoring API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize take-down notifier (webhook when configured, no-op otherwise)
    let notifier: Arc<dyn TakedownNotifier> = match &config.takedown_webhook_url {
        Some(url) => {
            info!("Take-down notifier: webhook ({url})");
            Arc::new(WebhookNotifier::new(url.clone()))
        }
        None => {
            info!("Take-down notifier: no-op");
            Arc::new(NoopNotifier)
        }
    };

    info!(
        "Moderation config: takedown threshold {}, accuracy clamp {}",
        config.takedown_threshold, config.clamp_accuracy
    );

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        notifier,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
