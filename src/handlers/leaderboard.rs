// Leaderboard routes - community rankings

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::ServiceError;
use crate::features::leaderboard::{build_leaderboard, build_ranking};
use crate::models::stats::{Leaderboard, Metric, RankedEntry};
use crate::AppState;

/// GET /leaderboard
pub async fn get_leaderboard(State(state): State<AppState>) -> Result<Json<Leaderboard>, ServiceError> {
    let board = build_leaderboard(state.store.as_ref()).await?;
    Ok(Json(board))
}

/// GET /leaderboard/:metric
pub async fn get_ranking(
    State(state): State<AppState>,
    Path(metric): Path<String>,
) -> Result<Json<Vec<RankedEntry>>, ServiceError> {
    let metric: Metric = metric
        .parse()
        .map_err(|_| ServiceError::UnknownMetric(metric.clone()))?;

    let ranking = build_ranking(state.store.as_ref(), metric).await?;
    Ok(Json(ranking))
}

#[cfg(test)]
mod tests {
    use crate::api::store::{MemoryStore, StatsStore};
    use crate::handlers::test_support::{app, get, send};
    use crate::models::stats::{Leaderboard, RankedEntry};
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_empty_store_returns_empty_board() {
        let (status, body) = send(app(Arc::new(MemoryStore::new())), get("/leaderboard")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "topCoins": [], "topEnemies": [], "allFastestTimes": [] })
        );
    }

    #[tokio::test]
    async fn test_leaderboard_body() {
        let store = Arc::new(MemoryStore::new());
        store
            .put(
                "a",
                json!({
                    "username": "a",
                    "coinsCollected": 5,
                    "fastestTimes": { "level1": { "L": [{ "N": "12.5" }, { "N": "bad" }, { "N": "3.2" }] } }
                }),
            )
            .await
            .unwrap();
        store
            .put("b", json!({ "username": "b", "coinsCollected": 9, "enemiesDefeated": 2 }))
            .await
            .unwrap();

        let (status, body) = send(app(store), get("/leaderboard")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["topCoins"],
            json!([
                { "username": "b", "metricValue": 9 },
                { "username": "a", "metricValue": 5 }
            ])
        );
        assert_eq!(body["topEnemies"][0], json!({ "username": "b", "metricValue": 2 }));
        assert_eq!(
            body["allFastestTimes"],
            json!([
                { "username": "a", "perLevel": { "level1": [3.2, 12.5] } },
                { "username": "b", "perLevel": {} }
            ])
        );

        let board: Leaderboard = serde_json::from_value(body).unwrap();
        assert_eq!(board.top_coins.len(), 2);
        assert_eq!(board.top_enemies[1].metric_value, 0);
        assert_eq!(board.all_fastest_times[0].per_level["level1"], vec![3.2, 12.5]);
    }

    #[tokio::test]
    async fn test_single_metric_ranking() {
        let store = Arc::new(MemoryStore::new());
        store
            .put("a", json!({ "username": "a", "enemiesDefeated": { "N": "3" } }))
            .await
            .unwrap();

        let (status, body) = send(app(store.clone()), get("/leaderboard/enemies")).await;
        assert_eq!(status, StatusCode::OK);
        let ranking: Vec<RankedEntry> = serde_json::from_value(body).unwrap();
        assert_eq!(
            ranking,
            vec![RankedEntry {
                username: "a".to_string(),
                metric_value: 3
            }]
        );

        let (status, body) = send(app(store), get("/leaderboard/speed")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Unknown metric: speed" }));
    }
}
