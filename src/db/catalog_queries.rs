use super::artwork_repository::RawArtworkRow;
use crate::models::{Artist, Artwork, Coordinates, Neighborhood};
use sqlx::PgPool;
use uuid::Uuid;

/// All neighborhoods, alphabetically
pub async fn list_neighborhoods(pool: &PgPool) -> Result<Vec<Neighborhood>, sqlx::Error> {
    let rows = sqlx::query_as::<_, NeighborhoodRow>(
        r#"
        SELECT id, name, center_lat, center_lng
        FROM neighborhoods
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(NeighborhoodRow::into_neighborhood).collect())
}

pub async fn find_neighborhood(
    pool: &PgPool,
    neighborhood_id: Uuid,
) -> Result<Option<Neighborhood>, sqlx::Error> {
    let row = sqlx::query_as::<_, NeighborhoodRow>(
        r#"
        SELECT id, name, center_lat, center_lng
        FROM neighborhoods
        WHERE id = $1
        "#,
    )
    .bind(neighborhood_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(NeighborhoodRow::into_neighborhood))
}

/// Artworks in a neighborhood, in insertion order
pub async fn find_artworks_in_neighborhood(
    pool: &PgPool,
    neighborhood_id: Uuid,
) -> Result<Vec<Artwork>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ArtworkRow>(
        r#"
        SELECT id, title, artist_id, neighborhood_id, lat, lng, image_url
        FROM artworks
        WHERE neighborhood_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(neighborhood_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|row| row.into_raw().into_artwork()).collect())
}

/// Artists with at least one artwork in the neighborhood
pub async fn find_artists_in_neighborhood(
    pool: &PgPool,
    neighborhood_id: Uuid,
) -> Result<Vec<Artist>, sqlx::Error> {
    sqlx::query_as::<_, ArtistRow>(
        r#"
        SELECT DISTINCT ar.id, ar.name, ar.bio, ar.image_url
        FROM artists ar
        JOIN artworks a ON a.artist_id = ar.id
        WHERE a.neighborhood_id = $1
        ORDER BY ar.name
        "#,
    )
    .bind(neighborhood_id)
    .fetch_all(pool)
    .await
    .map(|rows| rows.into_iter().map(Artist::from).collect())
}

/// Artworks by id joined with their artist's name (NULL when the artist is gone)
pub async fn find_artworks_with_artist(
    pool: &PgPool,
    ids: &[Uuid],
) -> Result<Vec<(Artwork, Option<String>)>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ArtworkWithArtistRow>(
        r#"
        SELECT
            a.id, a.title, a.artist_id, a.neighborhood_id, a.lat, a.lng, a.image_url,
            ar.name AS artist_name
        FROM artworks a
        LEFT JOIN artists ar ON ar.id = a.artist_id
        WHERE a.id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let artist_name = row.artist_name.clone();
            (row.into_raw().into_artwork(), artist_name)
        })
        .collect())
}

#[derive(sqlx::FromRow)]
struct NeighborhoodRow {
    id: Uuid,
    name: String,
    center_lat: Option<f64>,
    center_lng: Option<f64>,
}

impl NeighborhoodRow {
    fn into_neighborhood(self) -> Neighborhood {
        let center = match (self.center_lat, self.center_lng) {
            (Some(lat), Some(lng)) => Coordinates::new(lat, lng).ok(),
            _ => None,
        };
        Neighborhood {
            id: self.id,
            name: self.name,
            center,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ArtistRow {
    id: Uuid,
    name: String,
    bio: Option<String>,
    image_url: Option<String>,
}

impl From<ArtistRow> for Artist {
    fn from(row: ArtistRow) -> Self {
        Artist {
            id: row.id,
            name: row.name,
            bio: row.bio,
            image_url: row.image_url,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ArtworkRow {
    id: Uuid,
    title: String,
    artist_id: Uuid,
    neighborhood_id: Uuid,
    lat: f64,
    lng: f64,
    image_url: Option<String>,
}

impl ArtworkRow {
    fn into_raw(self) -> RawArtworkRow {
        RawArtworkRow {
            id: self.id,
            title: self.title,
            artist_id: self.artist_id,
            neighborhood_id: self.neighborhood_id,
            lat: self.lat,
            lng: self.lng,
            image_url: self.image_url,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ArtworkWithArtistRow {
    id: Uuid,
    title: String,
    artist_id: Uuid,
    neighborhood_id: Uuid,
    lat: f64,
    lng: f64,
    image_url: Option<String>,
    artist_name: Option<String>,
}

impl ArtworkWithArtistRow {
    fn into_raw(self) -> RawArtworkRow {
        RawArtworkRow {
            id: self.id,
            title: self.title,
            artist_id: self.artist_id,
            neighborhood_id: self.neighborhood_id,
            lat: self.lat,
            lng: self.lng,
            image_url: self.image_url,
        }
    }
}
