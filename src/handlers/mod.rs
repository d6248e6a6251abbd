// HTTP routes for the stats service

pub mod leaderboard;
pub mod player_stats;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the application router
pub fn router(state: AppState, cors_allow_origin: &str) -> Result<Router> {
    Ok(Router::new()
        .route("/health", get(health))
        .route(
            "/player-stats",
            get(player_stats::get_player_stats).post(player_stats::update_player_stats),
        )
        .route("/leaderboard", get(leaderboard::get_leaderboard))
        .route("/leaderboard/:metric", get(leaderboard::get_ranking))
        .layer(cors_layer(cors_allow_origin)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Fixed cross-origin headers for every response
fn cors_layer(allow_origin: &str) -> Result<CorsLayer> {
    let origin: AllowOrigin = if allow_origin == "*" {
        Any.into()
    } else {
        allow_origin
            .parse::<HeaderValue>()
            .with_context(|| format!("Invalid CORS origin: {}", allow_origin))?
            .into()
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
