use crate::error::{AppError, Result};
use crate::models::{DraftHistory, SelectionAction, TourDraft, TourSelection, TourVariation};
use crate::services::geolocation::{LocationReport, LocationStatus};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SaveDraftRequest {
    pub selection: TourSelection,
    #[serde(default)]
    pub variations: Vec<TourVariation>,
}

#[derive(Debug, Deserialize)]
pub struct RecordHistoryRequest {
    pub variation: TourVariation,
}

/// GET /drafts/{session}
pub async fn get_draft(
    State(state): State<Arc<AppState>>,
    Path(session): Path<Uuid>,
) -> Result<Json<TourDraft>> {
    state
        .drafts
        .load(session)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No draft for session {}", session)))
}

/// PUT /drafts/{session}
pub async fn put_draft(
    State(state): State<Arc<AppState>>,
    Path(session): Path<Uuid>,
    Json(request): Json<SaveDraftRequest>,
) -> Result<Json<TourDraft>> {
    let draft = state
        .drafts
        .save(session, request.selection, request.variations)
        .await?;
    Ok(Json(draft))
}

/// DELETE /drafts/{session}
pub async fn delete_draft(
    State(state): State<Arc<AppState>>,
    Path(session): Path<Uuid>,
) -> Result<StatusCode> {
    state.drafts.discard(session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /drafts/{session}/selection
pub async fn apply_selection(
    State(state): State<Arc<AppState>>,
    Path(session): Path<Uuid>,
    Json(action): Json<SelectionAction>,
) -> Result<Json<TourDraft>> {
    let confirmed = match action {
        SelectionAction::ConfirmStops { ref artwork_ids } => {
            state
                .tour_generator
                .resolve_confirmed_stops(artwork_ids)
                .await?
        }
        _ => Vec::new(),
    };

    tracing::debug!(session = %session, action = ?action, "Selection update");
    let draft = state.drafts.apply_action(session, action, confirmed).await?;
    Ok(Json(draft))
}

/// GET /drafts/{session}/history
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(session): Path<Uuid>,
) -> Json<DraftHistory> {
    Json(state.drafts.history(session).await)
}

/// POST /drafts/{session}/history
pub async fn record_history(
    State(state): State<Arc<AppState>>,
    Path(session): Path<Uuid>,
    Json(request): Json<RecordHistoryRequest>,
) -> Result<Json<DraftHistory>> {
    if !request.variation.is_selectable() {
        return Err(AppError::InvalidRequest(
            "A variation without directions cannot be completed".to_string(),
        ));
    }
    let history = state
        .drafts
        .record_completed(session, request.variation)
        .await?;
    Ok(Json(history))
}

/// GET /drafts/{session}/location
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(session): Path<Uuid>,
) -> Json<LocationStatus> {
    Json(state.locations.status(session).await)
}

/// POST /drafts/{session}/location
pub async fn report_location(
    State(state): State<Arc<AppState>>,
    Path(session): Path<Uuid>,
    Json(report): Json<LocationReport>,
) -> Result<Json<LocationStatus>> {
    if let LocationReport::Fix { position } = report {
        position.validate().map_err(AppError::InvalidRequest)?;
    }
    let status = state.locations.report(session, report).await;
    if let Some(ref warning) = status.warning {
        tracing::info!(session = %session, error = ?warning.error, "Location warning raised");
    }
    Ok(Json(status))
}
