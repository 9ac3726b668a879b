use crate::drafts::DraftStore;
use crate::error::{AppError, Result};
use crate::models::{
    DraftHistory, HistoryEntry, SelectionAction, Stop, TourDraft, TourSelection, TourVariation,
};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Applies expiry and history rules on top of a [`DraftStore`].
#[derive(Clone)]
pub struct DraftService {
    store: Arc<dyn DraftStore>,
    max_age: Duration,
    history_limit: usize,
}

impl DraftService {
    pub fn new(store: Arc<dyn DraftStore>, max_age_seconds: u64, history_limit: usize) -> Self {
        DraftService {
            store,
            max_age: Duration::seconds(max_age_seconds.min(i64::MAX as u64) as i64),
            history_limit,
        }
    }

    pub fn store(&self) -> &Arc<dyn DraftStore> {
        &self.store
    }

    /// The session's draft, unless it has expired (expired drafts are deleted)
    pub async fn load(&self, session: Uuid) -> Option<TourDraft> {
        self.load_at(session, OffsetDateTime::now_utc()).await
    }

    pub async fn load_at(&self, session: Uuid, now: OffsetDateTime) -> Option<TourDraft> {
        let draft = self.store.load_draft(session).await?;
        if draft.is_expired(now, self.max_age) {
            tracing::info!(session = %session, saved_at = %draft.saved_at, "Discarding expired draft");
            if let Err(e) = self.store.delete_draft(session).await {
                tracing::warn!(session = %session, error = %e, "Failed to delete expired draft");
            }
            return None;
        }
        Some(draft)
    }

    pub async fn save(
        &self,
        session: Uuid,
        selection: TourSelection,
        variations: Vec<TourVariation>,
    ) -> Result<TourDraft> {
        selection.validate().map_err(AppError::InvalidRequest)?;
        let draft = TourDraft::new(selection, variations, OffsetDateTime::now_utc());
        self.store.save_draft(session, &draft).await?;
        Ok(draft)
    }

    pub async fn discard(&self, session: Uuid) -> Result<()> {
        self.store.delete_draft(session).await
    }

    /// Apply one edit to the session's selection, starting from an empty one
    /// when there is no live draft. `confirmed` carries the resolved stops for
    /// [`SelectionAction::ConfirmStops`]. Generated variations are dropped since
    /// they no longer match the selection.
    pub async fn apply_action(
        &self,
        session: Uuid,
        action: SelectionAction,
        confirmed: Vec<Stop>,
    ) -> Result<TourDraft> {
        let mut selection = self
            .load(session)
            .await
            .map(|d| d.selection)
            .unwrap_or_default();

        match action {
            SelectionAction::SelectNeighborhood { neighborhood_id } => {
                selection.select_neighborhood(neighborhood_id)
            }
            SelectionAction::ToggleArtist { toggle } => selection.toggle_artist(toggle),
            SelectionAction::ToggleArtwork { toggle } => selection.toggle_artwork(toggle),
            SelectionAction::ConfirmStops { .. } => selection.confirm_stops(confirmed),
            SelectionAction::SetTourLength { minutes } => selection.tour_length_minutes = minutes,
        }

        self.save(session, selection, Vec::new()).await
    }

    /// Completed tours within the expiry window, newest first
    pub async fn history(&self, session: Uuid) -> DraftHistory {
        self.history_at(session, OffsetDateTime::now_utc()).await
    }

    pub async fn history_at(&self, session: Uuid, now: OffsetDateTime) -> DraftHistory {
        let mut history = self.store.load_history(session).await.unwrap_or_default();
        let removed = history.prune_expired(now, self.max_age);
        if removed > 0 {
            tracing::debug!(session = %session, removed, "Pruned expired history entries");
            if let Err(e) = self.store.save_history(session, &history).await {
                tracing::warn!(session = %session, error = %e, "Failed to store pruned history");
            }
        }
        history
    }

    pub async fn record_completed(
        &self,
        session: Uuid,
        variation: TourVariation,
    ) -> Result<DraftHistory> {
        self.record_completed_at(session, variation, OffsetDateTime::now_utc())
            .await
    }

    pub async fn record_completed_at(
        &self,
        session: Uuid,
        variation: TourVariation,
        now: OffsetDateTime,
    ) -> Result<DraftHistory> {
        let mut history = self.history_at(session, now).await;
        history.push(
            HistoryEntry {
                variation,
                completed_at: now,
            },
            self.history_limit,
        );
        self.store.save_history(session, &history).await?;
        Ok(history)
    }
}
