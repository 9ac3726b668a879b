use crate::error::{AppError, Result};
use crate::models::tour::{
    validate_points, DirectionsEnrichRequest, GenerateToursRequest, TourPlanResponse,
    VariationsResponse,
};
use crate::models::{PlainDirections, Stop};
use crate::services::directions::Reconciliation;
use crate::AppState;
use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    /// Plain directions as persisted by the client; validated before use
    pub directions: serde_json::Value,
    pub stops: Vec<Stop>,
}

/// POST /tours/generate
pub async fn generate_tours(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateToursRequest>,
) -> Result<Json<TourPlanResponse>> {
    tracing::info!(
        neighborhood = ?request.selection.neighborhood_id,
        tour_length_minutes = request.selection.tour_length_minutes,
        with_directions = request.with_directions,
        "Tour generation request"
    );

    request.validate().map_err(AppError::InvalidRequest)?;

    let origin = match (request.origin, request.session) {
        (Some(origin), _) => Some(origin),
        (None, Some(session)) => state.locations.last_position(session).await,
        (None, None) => None,
    };

    let plan = state
        .tour_generator
        .generate(&request.selection, origin, request.with_directions)
        .await?;

    Ok(Json(plan))
}

/// POST /tours/directions
pub async fn enrich_directions(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DirectionsEnrichRequest>,
) -> Result<Json<VariationsResponse>> {
    tracing::info!(
        variations = request.variations.len(),
        has_origin = request.origin.is_some(),
        "Directions request for {} variations",
        request.variations.len()
    );

    request.validate().map_err(AppError::InvalidRequest)?;

    let variations = state
        .tour_generator
        .enrich(request.variations, request.origin)
        .await;

    Ok(Json(VariationsResponse { variations }))
}

/// POST /tours/reconcile
pub async fn reconcile_directions(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReconcileRequest>,
) -> Result<Json<Reconciliation>> {
    validate_points(None, &request.stops).map_err(AppError::InvalidRequest)?;
    let directions = PlainDirections::from_value(request.directions)?;
    Ok(Json(
        state.tour_generator.reconcile(&directions, &request.stops),
    ))
}
