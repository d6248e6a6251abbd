// Single-player stat fetch and save

use tracing::{debug, info};

use super::normalizer::{normalize, to_record};
use crate::api::store::StatsStore;
use crate::error::ServiceError;
use crate::models::player::PlayerStat;

/// Fetch and normalize one player's stats
pub async fn fetch_player(store: &dyn StatsStore, username: &str) -> Result<PlayerStat, ServiceError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ServiceError::Validation("username is required".to_string()));
    }

    let raw = store
        .get(username)
        .await?
        .ok_or_else(|| ServiceError::NotFound(username.to_string()))?;

    let mut stat = normalize(&raw);
    if stat.username.is_empty() {
        debug!("Record for {} has no username field, using key", username);
        stat.username = username.to_string();
    }
    Ok(stat)
}

/// Overwrite a player's stored stats with this record
pub async fn save_player(store: &dyn StatsStore, stat: &PlayerStat) -> Result<(), ServiceError> {
    let username = stat.username.trim();
    if username.is_empty() {
        return Err(ServiceError::Validation("username is required".to_string()));
    }

    let mut stat = stat.clone();
    stat.username = username.to_string();
    store.put(username, to_record(&stat)).await?;

    info!("Saved stats for {}", username);
    Ok(())
}
