// Record normalizer
// Turns a loosely-typed stored record into a fully-defaulted PlayerStat

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use crate::models::player::{fields, PlayerStat, RawRecord};
use crate::utils::wire::{
    decode_integer, decode_string, decode_times, decode_times_lenient, encode_times, LIST_TAG,
};

/// Normalize a raw record. Never fails: each malformed field falls back to
/// its default on its own, so one bad field never drops the player.
///
/// | field             | default |
/// |-------------------|---------|
/// | `username`        | `""`    |
/// | `coinsCollected`  | `0`     |
/// | `enemiesDefeated` | `0`     |
/// | `levelsCompleted` | `[]`    |
/// | `fastestTimes`    | `{}`    |
pub fn normalize(raw: &RawRecord) -> PlayerStat {
    PlayerStat {
        username: raw
            .get(fields::USERNAME)
            .and_then(decode_string)
            .unwrap_or_default()
            .to_string(),
        coins_collected: integer_field(raw, fields::COINS_COLLECTED),
        enemies_defeated: integer_field(raw, fields::ENEMIES_DEFEATED),
        levels_completed: raw
            .get(fields::LEVELS_COMPLETED)
            .and_then(level_list)
            .unwrap_or_default(),
        fastest_times: raw
            .get(fields::FASTEST_TIMES)
            .map(|v| level_times(v, decode_times))
            .unwrap_or_default(),
    }
}

/// Normalize a client-submitted record. Same defaults as `normalize`, but a
/// level's times may also be a plain array, which is what reads return.
pub fn normalize_update(raw: &RawRecord) -> PlayerStat {
    PlayerStat {
        fastest_times: raw
            .get(fields::FASTEST_TIMES)
            .map(|v| level_times(v, decode_times_lenient))
            .unwrap_or_default(),
        ..normalize(raw)
    }
}

/// Build the stored form of a player record. Level times go out in the
/// tagged-list encoding so that `normalize` reads them back unchanged.
pub fn to_record(stat: &PlayerStat) -> RawRecord {
    let times: Map<String, Value> = stat
        .fastest_times
        .iter()
        .map(|(level, times)| (level.clone(), encode_times(times)))
        .collect();

    let mut record = Map::new();
    record.insert(fields::USERNAME.into(), json!(stat.username));
    record.insert(fields::COINS_COLLECTED.into(), json!(stat.coins_collected));
    record.insert(fields::ENEMIES_DEFEATED.into(), json!(stat.enemies_defeated));
    record.insert(fields::LEVELS_COMPLETED.into(), json!(stat.levels_completed));
    record.insert(fields::FASTEST_TIMES.into(), Value::Object(times));

    Value::Object(record)
}

fn integer_field(raw: &RawRecord, name: &str) -> i64 {
    raw.get(name).and_then(decode_integer).unwrap_or(0)
}

/// Plain array of strings, or the tagged `{ "L": [{ "S": .. }] }` form.
/// Any non-string element rejects the whole list.
fn level_list(value: &Value) -> Option<Vec<String>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(_) => value.get(LIST_TAG)?.as_array()?,
        _ => return None,
    };

    items
        .iter()
        .map(|item| decode_string(item).map(str::to_string))
        .collect()
}

/// Levels the decoder does not recognise are skipped.
fn level_times(
    value: &Value,
    decode: fn(&Value) -> Option<Vec<f64>>,
) -> BTreeMap<String, Vec<f64>> {
    let Some(levels) = value.as_object() else {
        return BTreeMap::new();
    };

    levels
        .iter()
        .filter_map(|(level, times)| decode(times).map(|t| (level.clone(), t)))
        .collect()
}
