use crate::constants::UNKNOWN_ARTIST_NAME;
use crate::error::{AppError, Result};
use crate::models::{Artwork, Coordinates, Neighborhood, NeighborhoodCatalog, Stop};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// Raw artwork fields read from a row, before validation.
pub(super) struct RawArtworkRow {
    pub id: Uuid,
    pub title: String,
    pub artist_id: Uuid,
    pub neighborhood_id: Uuid,
    pub lat: f64,
    pub lng: f64,
    pub image_url: Option<String>,
}

impl RawArtworkRow {
    pub fn into_artwork(self) -> Artwork {
        let coordinates = Coordinates::new(self.lat, self.lng).unwrap_or_else(|e| {
            tracing::error!(
                "Invalid coordinates for artwork '{}' (id: {}): {}. Using fallback.",
                self.title,
                self.id,
                e
            );
            Coordinates { lat: 0.0, lng: 0.0 }
        });

        Artwork {
            id: self.id,
            title: self.title,
            artist_id: self.artist_id,
            neighborhood_id: self.neighborhood_id,
            coordinates,
            image_url: self.image_url,
        }
    }
}

/// Read-only access to neighborhoods, artists and artworks.
#[async_trait]
pub trait ArtworkRepository: Send + Sync {
    async fn list_neighborhoods(&self) -> Result<Vec<Neighborhood>>;

    /// The neighborhood with its artworks and their artists
    async fn load_catalog(&self, neighborhood_id: Uuid) -> Result<NeighborhoodCatalog>;

    /// Stops for the given artworks, in the order of `ids`. Unknown ids are skipped.
    async fn find_stops_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Stop>>;

    async fn count(&self) -> Result<i64>;
}

/// Put `found` in the order of `ids`, dropping ids nothing was found for
pub(super) fn in_requested_order(ids: &[Uuid], found: Vec<Stop>) -> Vec<Stop> {
    let mut by_id: HashMap<Uuid, Stop> = found.into_iter().map(|s| (s.id, s)).collect();
    let stops: Vec<Stop> = ids.iter().filter_map(|id| by_id.remove(id)).collect();
    if stops.len() < ids.len() {
        tracing::warn!(
            requested = ids.len(),
            found = stops.len(),
            "Some requested artworks do not exist"
        );
    }
    stops
}

pub struct PgArtworkRepository {
    pool: sqlx::PgPool,
}

impl PgArtworkRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &sqlx::PgPool {
        &self.pool
    }
}

#[async_trait]
impl ArtworkRepository for PgArtworkRepository {
    async fn list_neighborhoods(&self) -> Result<Vec<Neighborhood>> {
        Ok(super::catalog_queries::list_neighborhoods(&self.pool).await?)
    }

    async fn load_catalog(&self, neighborhood_id: Uuid) -> Result<NeighborhoodCatalog> {
        let neighborhood = super::catalog_queries::find_neighborhood(&self.pool, neighborhood_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Neighborhood {}", neighborhood_id)))?;

        let artworks =
            super::catalog_queries::find_artworks_in_neighborhood(&self.pool, neighborhood_id)
                .await?;
        let artists =
            super::catalog_queries::find_artists_in_neighborhood(&self.pool, neighborhood_id)
                .await?;

        tracing::debug!(
            neighborhood = %neighborhood.name,
            artworks = artworks.len(),
            artists = artists.len(),
            "Loaded neighborhood catalog"
        );

        Ok(NeighborhoodCatalog::new(neighborhood, artworks, artists))
    }

    async fn find_stops_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Stop>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = super::catalog_queries::find_artworks_with_artist(&self.pool, ids).await?;
        let found = rows
            .into_iter()
            .map(|(artwork, artist_name)| {
                let name = artist_name.unwrap_or_else(|| {
                    tracing::warn!(
                        artwork_id = %artwork.id,
                        artist_id = %artwork.artist_id,
                        "Artwork references unknown artist"
                    );
                    UNKNOWN_ARTIST_NAME.to_string()
                });
                Stop::new(&artwork, &name)
            })
            .collect();

        Ok(in_requested_order(ids, found))
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM artworks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
