mod career;
mod config;
mod db;
mod errors;
mod identity;
mod models;
mod notify;
mod oracle;
mod routes;
mod state;
mod tracker;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::notify::HttpNotifier;
use crate::oracle::OracleClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tracker::store::{MemoryTaskStore, PgTaskStore, TaskStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SwitchBuddy API v{}", env!("CARGO_PKG_VERSION"));

    // Task store: PostgreSQL when configured, otherwise in-process
    let store: Arc<dyn TaskStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgTaskStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL is not set; tasks are kept in memory and lost on restart");
            Arc::new(MemoryTaskStore::new())
        }
    };

    // Initialize oracle client
    let oracle = OracleClient::new(config.anthropic_api_keys.clone())?;
    info!(
        "Oracle client initialized (model: {}, {} key(s))",
        crate::oracle::MODEL,
        config.anthropic_api_keys.len()
    );

    let notifier = Arc::new(HttpNotifier::new(
        reqwest::Client::new(),
        config.telegram_bot_token.clone(),
        config.whatsapp.clone(),
    ));
    info!(
        "Notifications: telegram={}, whatsapp={}",
        config.telegram_bot_token.is_some(),
        config.whatsapp.is_some()
    );

    let state = AppState {
        store,
        oracle,
        notifier,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
