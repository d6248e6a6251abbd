// Player stat routes - fetch and overwrite one player's record

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ServiceError;
use crate::features::normalizer::normalize_update;
use crate::features::player_stats::{fetch_player, save_player};
use crate::models::player::PlayerStat;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PlayerQuery {
    pub username: Option<String>,
}

/// GET /player-stats?username=...
pub async fn get_player_stats(
    State(state): State<AppState>,
    Query(params): Query<PlayerQuery>,
) -> Result<Json<PlayerStat>, ServiceError> {
    let username = params
        .username
        .ok_or_else(|| ServiceError::Validation("username is required".to_string()))?;

    let stat = fetch_player(state.store.as_ref(), &username).await?;
    Ok(Json(stat))
}

/// POST /player-stats
/// The body is normalized (plain or tagged level times), then written over the old one.
pub async fn update_player_stats(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ServiceError> {
    let stat = normalize_update(&body);
    save_player(state.store.as_ref(), &stat).await?;

    Ok(Json(json!({
        "message": "Player stats updated",
        "username": stat.username.trim()
    })))
}
