pub mod memory_store;
pub mod redis_store;

use crate::error::Result;
use crate::models::{DraftHistory, TourDraft};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use memory_store::MemoryDraftStore;
pub use redis_store::RedisDraftStore;

/// Per-session key-value storage for tour drafts and completed-tour history.
///
/// Reads never fail: an unreachable backend or a corrupt entry is logged and
/// reported as absent. Writes surface their errors.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn load_draft(&self, session: Uuid) -> Option<TourDraft>;

    async fn save_draft(&self, session: Uuid, draft: &TourDraft) -> Result<()>;

    async fn delete_draft(&self, session: Uuid) -> Result<()>;

    async fn load_history(&self, session: Uuid) -> Option<DraftHistory>;

    async fn save_history(&self, session: Uuid, history: &DraftHistory) -> Result<()>;

    async fn get_stats(&self) -> DraftStoreStats;

    async fn health_check(&self) -> bool;

    fn backend_name(&self) -> &'static str;
}

pub fn draft_key(session: Uuid) -> String {
    format!("draft:{}", session)
}

pub fn history_key(session: Uuid) -> String {
    format!("draft:history:{}", session)
}

/// Store statistics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftStoreStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub connected: bool,
}

impl DraftStoreStats {
    pub fn new(hits: u64, misses: u64, connected: bool) -> Self {
        let hit_rate = if hits + misses > 0 {
            (hits as f64 / (hits + misses) as f64) * 100.0
        } else {
            0.0
        };
        DraftStoreStats {
            hits,
            misses,
            hit_rate,
            connected,
        }
    }
}
