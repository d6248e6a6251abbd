// Ranking engine - top-N players by a single metric

use crate::models::player::PlayerStat;
use crate::models::stats::{Metric, RankedEntry};

/// Top `n` players by `metric`, highest first.
///
/// Ties keep their input order (`sort_by` is stable), so repeated scans of
/// the same data rank identically.
pub fn top_n(records: &[PlayerStat], metric: Metric, n: usize) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = records
        .iter()
        .map(|stat| RankedEntry {
            username: stat.username.clone(),
            metric_value: metric.value_of(stat),
        })
        .collect();

    entries.sort_by(|a, b| b.metric_value.cmp(&a.metric_value));
    entries.truncate(n);
    entries
}
