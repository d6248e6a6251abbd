// Leaderboard composer
// Builds top-coins, top-enemies and all fastest times from one store scan

use tracing::info;

use super::normalizer::normalize;
use super::ranking::top_n;
use super::time_aggregator::aggregate;
use crate::api::store::StatsStore;
use crate::error::ServiceError;
use crate::models::player::PlayerStat;
use crate::models::stats::{Leaderboard, Metric, RankedEntry};
use crate::utils::config::LEADERBOARD_SIZE;

/// Compose the leaderboard document from canonical records
pub fn compose(records: &[PlayerStat]) -> Leaderboard {
    Leaderboard {
        top_coins: top_n(records, Metric::Coins, LEADERBOARD_SIZE),
        top_enemies: top_n(records, Metric::Enemies, LEADERBOARD_SIZE),
        all_fastest_times: aggregate(records),
    }
}

/// Scan every stored player and normalize in scan order
async fn load_players(store: &dyn StatsStore) -> Result<Vec<PlayerStat>, ServiceError> {
    let raw = store.scan_all().await?;
    Ok(raw.iter().map(normalize).collect())
}

/// Full leaderboard from the current store snapshot
pub async fn build_leaderboard(store: &dyn StatsStore) -> Result<Leaderboard, ServiceError> {
    let players = load_players(store).await?;
    info!("Building leaderboard from {} player(s)", players.len());
    Ok(compose(&players))
}

/// Single-metric ranking from the current store snapshot
pub async fn build_ranking(
    store: &dyn StatsStore,
    metric: Metric,
) -> Result<Vec<RankedEntry>, ServiceError> {
    let players = load_players(store).await?;
    info!("Ranking {} player(s) by {}", players.len(), metric.label());
    Ok(top_n(&players, metric, LEADERBOARD_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::store::MemoryStore;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use serde_json::json;

    fn player(name: &str, coins: i64, enemies: i64) -> PlayerStat {
        PlayerStat {
            coins_collected: coins,
            enemies_defeated: enemies,
            ..PlayerStat::new(name)
        }
    }

    #[test]
    fn test_compose_empty() {
        assert_eq!(compose(&[]), Leaderboard::default());
        assert_eq!(
            serde_json::to_value(compose(&[])).unwrap(),
            json!({ "topCoins": [], "topEnemies": [], "allFastestTimes": [] })
        );
    }

    #[test]
    fn test_compose_caps_rankings_at_ten() {
        let records: Vec<PlayerStat> = (0..15)
            .map(|i| player(&format!("p{}", i), i, 15 - i))
            .collect();

        let board = compose(&records);
        assert_eq!(board.top_coins.len(), 10);
        assert_eq!(board.top_enemies.len(), 10);
        assert_eq!(board.all_fastest_times.len(), 15);
        assert_eq!(board.top_coins[0].username, "p14");
        assert_eq!(board.top_enemies[0].username, "p0");
    }

    #[test]
    fn test_compose_is_idempotent() {
        let mut runner = player("runner", 3, 3);
        runner.fastest_times.insert("level1".into(), vec![1.0, 2.0]);
        let records = vec![runner, player("other", 3, 1)];

        assert_eq!(compose(&records), compose(&records));
    }

    #[tokio::test]
    async fn test_build_leaderboard_from_store() {
        let store = MemoryStore::new();
        store
            .put(
                "alice",
                json!({
                    "username": "alice",
                    "coinsCollected": "12",
                    "fastestTimes": { "level1": { "L": [{ "N": "9.5" }, { "N": "2.5" }] } }
                }),
            )
            .await
            .unwrap();
        store
            .put("bob", json!({ "username": "bob", "enemiesDefeated": 4 }))
            .await
            .unwrap();

        let board = build_leaderboard(&store).await.unwrap();
        assert_eq!(board.top_coins[0].username, "alice");
        assert_eq!(board.top_coins[1].metric_value, 0);
        assert_eq!(board.top_enemies[0].username, "bob");
        assert_eq!(board.all_fastest_times[0].per_level["level1"], vec![2.5, 9.5]);
        assert!(board.all_fastest_times[1].per_level.is_empty());

        let ranking = build_ranking(&store, Metric::Enemies).await.unwrap();
        assert_eq!(ranking[0].metric_value, 4);
    }

    struct FailingStore;

    #[async_trait]
    impl StatsStore for FailingStore {
        async fn get(&self, _username: &str) -> Result<Option<serde_json::Value>> {
            Err(anyhow!("connection refused"))
        }

        async fn put(&self, _username: &str, _record: serde_json::Value) -> Result<()> {
            Err(anyhow!("connection refused"))
        }

        async fn scan_all(&self) -> Result<Vec<serde_json::Value>> {
            Err(anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let err = build_leaderboard(&FailingStore).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
    }
}
