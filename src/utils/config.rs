// Centralized configuration for the stats service

use anyhow::{anyhow, Result};
use std::env;
use std::time::Duration;

/// Number of players shown in each leaderboard ranking
pub const LEADERBOARD_SIZE: usize = 10;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_TABLE: &str = "PlayerStats";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

/// AWS credentials used to sign store requests
#[derive(Debug, Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

/// DynamoDB table settings
#[derive(Debug, Clone)]
pub struct DynamoConfig {
    pub table: String,
    pub region: String,
    pub endpoint: String,
    pub credentials: AwsCredentials,
    pub timeout: Duration,
}

/// Which record store backs the service
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Memory,
    Dynamo(DynamoConfig),
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub cors_allow_origin: String,
    pub store: StoreBackend,
}

impl Config {
    /// Load from the process environment (after `.env` has been applied)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = match get("STORE_BACKEND")
            .unwrap_or_else(|| "dynamo".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "dynamo" | "dynamodb" => {
                let region = get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
                let endpoint = get("DYNAMO_ENDPOINT")
                    .unwrap_or_else(|| format!("https://dynamodb.{}.amazonaws.com", region));
                let timeout_secs = match get("STORE_TIMEOUT_SECS") {
                    Some(v) => v
                        .parse::<u64>()
                        .map_err(|_| anyhow!("STORE_TIMEOUT_SECS must be a number, got {}", v))?,
                    None => DEFAULT_STORE_TIMEOUT_SECS,
                };

                StoreBackend::Dynamo(DynamoConfig {
                    table: get("STATS_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string()),
                    region,
                    endpoint,
                    credentials: AwsCredentials {
                        access_key_id: get("AWS_ACCESS_KEY_ID")
                            .ok_or_else(|| anyhow!("AWS_ACCESS_KEY_ID must be set"))?,
                        secret_access_key: get("AWS_SECRET_ACCESS_KEY")
                            .ok_or_else(|| anyhow!("AWS_SECRET_ACCESS_KEY must be set"))?,
                        session_token: get("AWS_SESSION_TOKEN"),
                    },
                    timeout: Duration::from_secs(timeout_secs),
                })
            }
            other => return Err(anyhow!("Unknown STORE_BACKEND: {}", other)),
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            cors_allow_origin: get("CORS_ALLOW_ORIGIN").unwrap_or_else(|| "*".to_string()),
            store,
        })
    }
}
