use crate::models::{TourSelection, TourVariation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// The tour a user is currently building, as persisted between visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourDraft {
    pub selection: TourSelection,
    #[serde(default)]
    pub variations: Vec<TourVariation>,
    #[serde(with = "time::serde::rfc3339")]
    pub saved_at: OffsetDateTime,
}

impl TourDraft {
    pub fn new(selection: TourSelection, variations: Vec<TourVariation>, now: OffsetDateTime) -> Self {
        TourDraft {
            selection,
            variations,
            saved_at: now,
        }
    }

    pub fn is_expired(&self, now: OffsetDateTime, max_age: Duration) -> bool {
        is_expired(self.saved_at, now, max_age)
    }
}

/// A tour the user picked and walked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub variation: TourVariation,
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,
}

/// Completed tours, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftHistory {
    pub entries: Vec<HistoryEntry>,
}

impl DraftHistory {
    /// Insert at the front, dropping the oldest entries beyond `limit`
    pub fn push(&mut self, entry: HistoryEntry, limit: usize) {
        self.entries.insert(0, entry);
        self.entries.truncate(limit);
    }

    /// Drop expired entries and report how many went
    pub fn prune_expired(&mut self, now: OffsetDateTime, max_age: Duration) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !is_expired(entry.completed_at, now, max_age));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_expired(timestamp: OffsetDateTime, now: OffsetDateTime, max_age: Duration) -> bool {
    now - timestamp > max_age
}
