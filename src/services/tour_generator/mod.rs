pub mod candidates;
pub mod stop_budget;
pub mod variations;

use crate::config::TourConfig;
use crate::db::ArtworkRepository;
use crate::error::{AppError, Result};
use crate::models::{
    Coordinates, DistanceMeters, NeighborhoodCatalog, PlainDirections, RouteEstimate, Stop,
    TourPlanResponse, TourSelection, TourVariation, VariationStatus,
};
use crate::services::directions::{
    reconcile, to_plain, DirectionsProvider, DirectionsRequest, Reconciliation,
};
use futures::future::join_all;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub use candidates::{assemble_candidates, CandidatePool};
pub use stop_budget::max_stops;
pub use variations::{compact, diverse, generate_all, popular};

pub struct TourGenerator {
    repo: Arc<dyn ArtworkRepository>,
    directions: Arc<dyn DirectionsProvider>,
    config: TourConfig,
}

impl TourGenerator {
    pub fn new(
        repo: Arc<dyn ArtworkRepository>,
        directions: Arc<dyn DirectionsProvider>,
        config: TourConfig,
    ) -> Self {
        TourGenerator {
            repo,
            directions,
            config,
        }
    }

    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    pub fn max_stops(&self, tour_length_minutes: u32) -> usize {
        max_stops(
            tour_length_minutes,
            self.config.viewing_minutes_per_stop,
            self.config.viewing_share_pct,
        )
    }

    /// Build the three variations for `selection`, optionally with directions.
    pub async fn generate(
        &self,
        selection: &TourSelection,
        origin: Option<Coordinates>,
        with_directions: bool,
    ) -> Result<TourPlanResponse> {
        selection.validate().map_err(AppError::InvalidRequest)?;

        let catalog = if selection.candidate_source().is_randomized() {
            let neighborhood_id = selection.neighborhood_id.ok_or_else(|| {
                AppError::InvalidRequest("A neighborhood must be selected".to_string())
            })?;
            Some(self.repo.load_catalog(neighborhood_id).await?)
        } else {
            None
        };

        let mut plan = {
            let mut rng = rand::rng();
            self.build_plan(selection, catalog.as_ref(), &mut rng)?
        };

        tracing::info!(
            source = ?plan.candidate_source,
            candidates = plan.candidate_count,
            max_stops = plan.max_stops,
            "Generated {} tour variations from {} candidates (budget {})",
            plan.variations.len(), plan.candidate_count, plan.max_stops
        );

        if with_directions {
            plan.variations = self.enrich(plan.variations, origin).await;
        }

        Ok(plan)
    }

    /// Candidate assembly and variation generation, without any I/O
    pub fn build_plan<R: Rng + ?Sized>(
        &self,
        selection: &TourSelection,
        catalog: Option<&NeighborhoodCatalog>,
        rng: &mut R,
    ) -> Result<TourPlanResponse> {
        let budget = self.max_stops(selection.tour_length_minutes);
        let pool = assemble_candidates(selection, catalog, &mut *rng)?;

        if budget == 0 || pool.is_empty() {
            tracing::debug!(
                max_stops = budget,
                candidates = pool.len(),
                "Nothing fits the tour; variations will be empty"
            );
        }

        let variations = generate_all(&pool.candidates, budget, rng);

        Ok(TourPlanResponse {
            max_stops: budget,
            candidate_source: pool.source,
            candidate_count: pool.len(),
            preview: pool.preview(budget),
            variations,
        })
    }

    /// Fetch directions for every pending variation concurrently. Each result
    /// lands in its own slot; a failing variation never affects the others.
    pub async fn enrich(
        &self,
        variations: Vec<TourVariation>,
        origin: Option<Coordinates>,
    ) -> Vec<TourVariation> {
        let tasks = variations
            .into_iter()
            .map(|variation| self.resolve_variation(variation, origin));
        let enriched = join_all(tasks).await;

        let unresolved = enriched.iter().filter(|v| !v.is_selectable()).count();
        if unresolved > 0 {
            tracing::warn!(unresolved, total = enriched.len(), "Some variations have no directions");
        }

        enriched
    }

    async fn resolve_variation(
        &self,
        mut variation: TourVariation,
        origin: Option<Coordinates>,
    ) -> TourVariation {
        if variation.status != VariationStatus::Pending {
            return variation;
        }

        let Some(request) =
            DirectionsRequest::for_stops(&variation.stops, origin, self.config.optimize_waypoints)
        else {
            variation.mark_unresolved("At least two points are needed for walking directions");
            return variation;
        };

        let attempts = self.config.directions_max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.directions.walking_directions(&request).await {
                Ok(native) => {
                    return match to_plain(&native) {
                        Ok(plain) => {
                            let estimate = self.estimate(&plain, variation.stops.len());
                            tracing::debug!(
                                variation = %variation.kind,
                                attempt,
                                walking_minutes = estimate.walking_minutes,
                                distance = %estimate.distance_km,
                                "Directions resolved"
                            );
                            variation.resolve(plain, estimate);
                            variation
                        }
                        Err(e) => {
                            tracing::warn!(
                                variation = %variation.kind,
                                path = e.path(),
                                "Directions response rejected: {}",
                                e
                            );
                            variation.mark_unresolved(format!("Directions response rejected: {}", e));
                            variation
                        }
                    };
                }
                Err(e @ AppError::MapboxApi(_)) => {
                    tracing::warn!(
                        variation = %variation.kind,
                        attempt,
                        max_attempts = attempts,
                        "Directions request failed: {}",
                        e
                    );
                    last_error = e.to_string();
                    if attempt < attempts {
                        let backoff = self.config.directions_retry_backoff_ms * attempt as u64;
                        tokio::time::sleep(Duration::from_millis(backoff)).await;
                    }
                }
                Err(e) => {
                    // Only provider failures can change on a second try
                    tracing::warn!(
                        variation = %variation.kind,
                        "Directions request refused: {}",
                        e
                    );
                    variation.mark_unresolved(format!("Directions unavailable: {}", e));
                    return variation;
                }
            }
        }

        variation.mark_unresolved(format!(
            "Directions unavailable after {} attempts: {}",
            attempts, last_error
        ));
        variation
    }

    fn estimate(&self, directions: &PlainDirections, stop_count: usize) -> RouteEstimate {
        let (meters, seconds) = directions
            .routes
            .first()
            .map(|r| (r.distance_meters(), r.duration_seconds()))
            .unwrap_or((0.0, 0.0));
        let walking_minutes = (seconds / 60.0).round() as u32;
        let viewing_minutes = stop_count as u32 * self.config.viewing_minutes_per_stop;

        RouteEstimate {
            walking_minutes,
            distance_km: DistanceMeters(meters).to_km(),
            total_minutes: walking_minutes + viewing_minutes,
        }
    }

    /// Which directions step arrives at which stop
    pub fn reconcile(&self, directions: &PlainDirections, stops: &[Stop]) -> Reconciliation {
        reconcile(
            directions,
            stops,
            DistanceMeters(self.config.arrival_threshold_m),
        )
    }

    /// Turn the user's ordered artwork picks into stops. Every id must exist.
    pub async fn resolve_confirmed_stops(&self, artwork_ids: &[Uuid]) -> Result<Vec<Stop>> {
        let stops = self.repo.find_stops_by_ids(artwork_ids).await?;
        if stops.len() != artwork_ids.len() {
            let missing: Vec<String> = artwork_ids
                .iter()
                .filter(|id| !stops.iter().any(|s| s.id == **id))
                .map(|id| id.to_string())
                .collect();
            if missing.is_empty() {
                return Err(AppError::InvalidRequest(
                    "Each artwork can only be a stop once".to_string(),
                ));
            }
            return Err(AppError::NotFound(format!(
                "Artworks not found: {}",
                missing.join(", ")
            )));
        }
        Ok(stops)
    }
}
