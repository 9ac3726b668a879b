use crate::error::{AppError, Result};
use crate::models::{Artwork, CandidateSource, NeighborhoodCatalog, Selection, Stop, TourSelection};
use rand::{seq::SliceRandom, Rng};
use serde::Serialize;
use uuid::Uuid;

/// The stops a tour may be built from, before any variation is applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidatePool {
    pub source: CandidateSource,
    /// Shuffled for drawn sources, user order for confirmed stops
    pub candidates: Vec<Stop>,
}

impl CandidatePool {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The pool cut down to the stop budget. Confirmed stops are never cut.
    pub fn preview(&self, max_stops: usize) -> Vec<Stop> {
        if self.source.is_randomized() {
            self.candidates.iter().take(max_stops).cloned().collect()
        } else {
            self.candidates.clone()
        }
    }
}

/// Build the candidate pool for `selection`. Drawn sources need the
/// neighborhood catalog; confirmed stops are taken as-is.
pub fn assemble_candidates<R: Rng + ?Sized>(
    selection: &TourSelection,
    catalog: Option<&NeighborhoodCatalog>,
    rng: &mut R,
) -> Result<CandidatePool> {
    let source = selection.candidate_source();

    let candidates = match source {
        CandidateSource::ConfirmedStops => selection.confirmed_stops.clone(),
        _ => {
            let catalog = catalog.ok_or_else(|| {
                AppError::InvalidRequest("A neighborhood must be selected".to_string())
            })?;
            let mut drawn = match source {
                CandidateSource::ExplicitArtworks => draw(catalog, &selection.artworks, |a| a.id),
                CandidateSource::ExplicitArtists => {
                    draw(catalog, &selection.artists, |a| a.artist_id)
                }
                _ => draw(catalog, &Selection::Wildcard, |a| a.id),
            };
            drawn.shuffle(rng);
            drawn
        }
    };

    tracing::debug!(
        source = ?source,
        candidates = candidates.len(),
        "Assembled {} candidate stops",
        candidates.len()
    );

    Ok(CandidatePool { source, candidates })
}

/// Stops for every artwork in the catalog whose key is in `filter`
fn draw(
    catalog: &NeighborhoodCatalog,
    filter: &Selection,
    key: impl Fn(&Artwork) -> Uuid,
) -> Vec<Stop> {
    catalog
        .artworks
        .iter()
        .filter(|artwork| filter.is_wildcard() || filter.contains(&key(artwork)))
        .map(|artwork| catalog.stop_for(artwork))
        .collect()
}
