// Game Stats Service
// Stores per-player stats and serves coin, enemy and fastest-time leaderboards

mod api;
mod error;
mod features;
mod handlers;
mod models;
mod utils;

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::dynamo::DynamoClient;
use crate::api::store::{MemoryStore, StatsStore};
use crate::utils::config::{Config, StoreBackend};

/// State shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StatsStore>,
}

// Manual Debug impl since the store trait object doesn't impl Debug
impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &"StatsStore")
            .finish()
    }
}

/// Build the record store selected by config
fn build_store(backend: &StoreBackend) -> Result<Arc<dyn StatsStore>> {
    match backend {
        StoreBackend::Memory => {
            info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Dynamo(dynamo) => {
            let http_client = reqwest::Client::builder()
                .user_agent("GameStats/1.0")
                .build()
                .context("Failed to create HTTP client")?;

            let client = DynamoClient::new(http_client, dynamo.clone())?;
            info!(
                "DynamoDB client initialized (table {}, {})",
                dynamo.table, dynamo.endpoint
            );
            Ok(Arc::new(client))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "gamestats_rs=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    info!("Starting Game Stats service...");

    let store = build_store(&config.store)?;
    let app = handlers::router(AppState { store }, &config.cors_allow_origin)?;

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down...");
        })
        .await
        .context("Server error")?;

    info!("Goodbye!");
    Ok(())
}
