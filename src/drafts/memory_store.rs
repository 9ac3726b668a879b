use crate::drafts::{DraftStore, DraftStoreStats};
use crate::error::Result;
use crate::models::{DraftHistory, TourDraft};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// In-memory draft store backed by moka with TTL and bounded capacity.
pub struct MemoryDraftStore {
    drafts: Cache<Uuid, Arc<TourDraft>>,
    histories: Cache<Uuid, Arc<DraftHistory>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryDraftStore {
    pub fn new(ttl_seconds: u64, max_sessions: u64) -> Self {
        let ttl = Duration::from_secs(ttl_seconds);
        MemoryDraftStore {
            drafts: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_sessions)
                .build(),
            histories: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_sessions)
                .build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn record<T>(&self, found: &Option<T>) {
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn load_draft(&self, session: Uuid) -> Option<TourDraft> {
        let found = self.drafts.get(&session).await.map(|d| (*d).clone());
        self.record(&found);
        tracing::debug!(session = %session, hit = found.is_some(), "Memory draft lookup");
        found
    }

    async fn save_draft(&self, session: Uuid, draft: &TourDraft) -> Result<()> {
        self.drafts.insert(session, Arc::new(draft.clone())).await;
        tracing::debug!(session = %session, "Memory stored draft");
        Ok(())
    }

    async fn delete_draft(&self, session: Uuid) -> Result<()> {
        self.drafts.invalidate(&session).await;
        Ok(())
    }

    async fn load_history(&self, session: Uuid) -> Option<DraftHistory> {
        let found = self.histories.get(&session).await.map(|h| (*h).clone());
        self.record(&found);
        found
    }

    async fn save_history(&self, session: Uuid, history: &DraftHistory) -> Result<()> {
        self.histories
            .insert(session, Arc::new(history.clone()))
            .await;
        tracing::debug!(session = %session, entries = history.len(), "Memory stored history");
        Ok(())
    }

    async fn get_stats(&self) -> DraftStoreStats {
        DraftStoreStats::new(
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            true,
        )
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
