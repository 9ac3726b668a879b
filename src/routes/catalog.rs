use crate::error::Result;
use crate::models::{Artist, Artwork, Neighborhood};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// What the tour builder shows for one neighborhood
#[derive(Debug, Serialize, Deserialize)]
pub struct NeighborhoodArtworksResponse {
    pub neighborhood: Neighborhood,
    /// Sorted by name
    pub artists: Vec<Artist>,
    pub artworks: Vec<Artwork>,
}

/// GET /neighborhoods
pub async fn list_neighborhoods(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Neighborhood>>> {
    let neighborhoods = state.repo.list_neighborhoods().await?;
    tracing::debug!(count = neighborhoods.len(), "Listed neighborhoods");
    Ok(Json(neighborhoods))
}

/// GET /neighborhoods/{id}/artworks
pub async fn neighborhood_artworks(
    State(state): State<Arc<AppState>>,
    Path(neighborhood_id): Path<Uuid>,
) -> Result<Json<NeighborhoodArtworksResponse>> {
    let catalog = state.repo.load_catalog(neighborhood_id).await?;

    let mut artists: Vec<Artist> = catalog.artists.into_values().collect();
    artists.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Json(NeighborhoodArtworksResponse {
        neighborhood: catalog.neighborhood,
        artists,
        artworks: catalog.artworks,
    }))
}
