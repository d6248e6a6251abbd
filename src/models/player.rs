// Player stat data model
// Matches the stored player record, keyed by username

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Untyped record as returned by the store. Never leaves the normalizer.
pub type RawRecord = Value;

/// Stored field names
pub mod fields {
    pub const USERNAME: &str = "username";
    pub const COINS_COLLECTED: &str = "coinsCollected";
    pub const ENEMIES_DEFEATED: &str = "enemiesDefeated";
    pub const LEVELS_COMPLETED: &str = "levelsCompleted";
    pub const FASTEST_TIMES: &str = "fastestTimes";
}

/// Canonical, fully-defaulted player statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerStat {
    pub username: String,
    #[serde(rename = "coinsCollected")]
    pub coins_collected: i64,
    #[serde(rename = "enemiesDefeated")]
    pub enemies_defeated: i64,
    #[serde(rename = "levelsCompleted")]
    pub levels_completed: Vec<String>,
    /// Level id -> attempt durations in seconds, ascending
    #[serde(rename = "fastestTimes")]
    pub fastest_times: BTreeMap<String, Vec<f64>>,
}

impl PlayerStat {
    /// Create an empty stat record for a player
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            ..Default::default()
        }
    }
}
