// Per-player level time aggregation

use crate::models::player::PlayerStat;
use crate::models::stats::LevelTimes;

/// Project each record onto its level times, keeping scan order.
/// Times were sorted by the normalizer and are copied as-is.
pub fn aggregate(records: &[PlayerStat]) -> Vec<LevelTimes> {
    records
        .iter()
        .map(|stat| LevelTimes {
            username: stat.username.clone(),
            per_level: stat.fastest_times.clone(),
        })
        .collect()
}
