// Statistics models for leaderboard and rankings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::player::PlayerStat;

/// Entry in a single-metric ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub username: String,
    #[serde(rename = "metricValue")]
    pub metric_value: i64,
}

/// All recorded level times for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTimes {
    pub username: String,
    #[serde(rename = "perLevel")]
    pub per_level: BTreeMap<String, Vec<f64>>,
}

/// Composed leaderboard document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    #[serde(rename = "topCoins")]
    pub top_coins: Vec<RankedEntry>,
    #[serde(rename = "topEnemies")]
    pub top_enemies: Vec<RankedEntry>,
    #[serde(rename = "allFastestTimes")]
    pub all_fastest_times: Vec<LevelTimes>,
}

/// Scalar stat used as a ranking key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Coins,
    Enemies,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Coins => "coins",
            Metric::Enemies => "enemies",
        }
    }

    /// Value of this metric on a player record
    pub fn value_of(&self, stat: &PlayerStat) -> i64 {
        match self {
            Metric::Coins => stat.coins_collected,
            Metric::Enemies => stat.enemies_defeated,
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "coins" | "coinscollected" | "coins_collected" => Ok(Metric::Coins),
            "enemies" | "enemiesdefeated" | "enemies_defeated" => Ok(Metric::Enemies),
            _ => Err(format!("Unknown metric: {}", s)),
        }
    }
}
