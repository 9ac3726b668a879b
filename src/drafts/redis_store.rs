use crate::drafts::{draft_key, history_key, DraftStore, DraftStoreStats};
use crate::error::{AppError, Result};
use crate::models::{DraftHistory, TourDraft};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// Redis-backed draft store. Entries expire after `ttl` seconds.
pub struct RedisDraftStore {
    connection: ConnectionManager,
    ttl: u64,
}

impl RedisDraftStore {
    pub async fn new(redis_url: &str, ttl: u64) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| AppError::DraftStore(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::DraftStore(format!("Failed to connect to Redis: {}", e)))?;

        tracing::info!("Redis draft store connection established");

        Ok(RedisDraftStore { connection, ttl })
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.connection.clone();
        let result: redis::RedisResult<Option<String>> = conn.get(key).await;

        match result {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => {
                    tracing::debug!("Draft store hit: {}", key);
                    Some(value)
                }
                Err(e) => {
                    tracing::warn!("Failed to deserialize stored entry {}: {}", key, e);
                    None
                }
            },
            Ok(None) => {
                tracing::debug!("Draft store miss: {}", key);
                None
            }
            Err(e) => {
                tracing::warn!("Redis error reading {}: {}", key, e);
                None
            }
        }
    }

    async fn set_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::DraftStore(format!("Failed to serialize {}: {}", key, e)))?;

        let mut conn = self.connection.clone();
        let result: redis::RedisResult<()> = conn.set_ex(key, json, self.ttl).await;

        result.map_err(|e| {
            tracing::warn!("Failed to store {}: {}", key, e);
            AppError::DraftStore(format!("Failed to store {}: {}", key, e))
        })?;
        tracing::debug!("Stored {} with TTL {}s", key, self.ttl);
        Ok(())
    }
}

#[async_trait]
impl DraftStore for RedisDraftStore {
    async fn load_draft(&self, session: Uuid) -> Option<TourDraft> {
        self.get_json(&draft_key(session)).await
    }

    async fn save_draft(&self, session: Uuid, draft: &TourDraft) -> Result<()> {
        self.set_json(&draft_key(session), draft).await
    }

    async fn delete_draft(&self, session: Uuid) -> Result<()> {
        let mut conn = self.connection.clone();
        let result: redis::RedisResult<()> = conn.del(draft_key(session)).await;
        result.map_err(|e| AppError::DraftStore(format!("Failed to delete draft: {}", e)))
    }

    async fn load_history(&self, session: Uuid) -> Option<DraftHistory> {
        self.get_json(&history_key(session)).await
    }

    async fn save_history(&self, session: Uuid, history: &DraftHistory) -> Result<()> {
        self.set_json(&history_key(session), history).await
    }

    async fn get_stats(&self) -> DraftStoreStats {
        let mut conn = self.connection.clone();
        let info: redis::RedisResult<String> =
            redis::cmd("INFO").arg("stats").query_async(&mut conn).await;

        match info {
            Ok(info_str) => DraftStoreStats::new(
                parse_info_value(&info_str, "keyspace_hits"),
                parse_info_value(&info_str, "keyspace_misses"),
                true,
            ),
            Err(_) => DraftStoreStats::new(0, 0, false),
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.connection.clone();
        let result: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        result.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

fn parse_info_value(info: &str, key: &str) -> u64 {
    info.lines()
        .find(|line| line.starts_with(key))
        .and_then(|line| line.split(':').nth(1))
        .and_then(|val| val.trim().parse().ok())
        .unwrap_or(0)
}
