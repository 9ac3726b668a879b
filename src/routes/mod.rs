pub mod catalog;
pub mod debug;
pub mod drafts;
pub mod tours;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/neighborhoods", get(catalog::list_neighborhoods))
        .route(
            "/neighborhoods/{id}/artworks",
            get(catalog::neighborhood_artworks),
        )
        .route("/tours/generate", post(tours::generate_tours))
        .route("/tours/directions", post(tours::enrich_directions))
        .route("/tours/reconcile", post(tours::reconcile_directions))
        .route(
            "/drafts/{session}",
            get(drafts::get_draft)
                .put(drafts::put_draft)
                .delete(drafts::delete_draft),
        )
        .route("/drafts/{session}/selection", post(drafts::apply_selection))
        .route(
            "/drafts/{session}/history",
            get(drafts::get_history).post(drafts::record_history),
        )
        .route(
            "/drafts/{session}/location",
            get(drafts::get_location).post(drafts::report_location),
        )
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
