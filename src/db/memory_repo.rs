use super::artwork_repository::{in_requested_order, ArtworkRepository};
use crate::error::{AppError, Result};
use crate::models::{Artist, Artwork, Neighborhood, NeighborhoodCatalog, Stop};
use async_trait::async_trait;
use uuid::Uuid;

/// Catalog held in memory, for tests and local demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtworkRepository {
    neighborhoods: Vec<Neighborhood>,
    artists: Vec<Artist>,
    artworks: Vec<Artwork>,
}

impl InMemoryArtworkRepository {
    pub fn new(neighborhoods: Vec<Neighborhood>, artists: Vec<Artist>, artworks: Vec<Artwork>) -> Self {
        Self {
            neighborhoods,
            artists,
            artworks,
        }
    }

    fn artist_name(&self, artist_id: &Uuid) -> Option<&str> {
        self.artists
            .iter()
            .find(|a| a.id == *artist_id)
            .map(|a| a.name.as_str())
    }
}

#[async_trait]
impl ArtworkRepository for InMemoryArtworkRepository {
    async fn list_neighborhoods(&self) -> Result<Vec<Neighborhood>> {
        let mut neighborhoods = self.neighborhoods.clone();
        neighborhoods.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(neighborhoods)
    }

    async fn load_catalog(&self, neighborhood_id: Uuid) -> Result<NeighborhoodCatalog> {
        let neighborhood = self
            .neighborhoods
            .iter()
            .find(|n| n.id == neighborhood_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Neighborhood {}", neighborhood_id)))?;

        let artworks: Vec<Artwork> = self
            .artworks
            .iter()
            .filter(|a| a.neighborhood_id == neighborhood_id)
            .cloned()
            .collect();
        let artists = self
            .artists
            .iter()
            .filter(|artist| artworks.iter().any(|a| a.artist_id == artist.id))
            .cloned()
            .collect();

        Ok(NeighborhoodCatalog::new(neighborhood, artworks, artists))
    }

    async fn find_stops_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Stop>> {
        let found = self
            .artworks
            .iter()
            .filter(|a| ids.contains(&a.id))
            .map(|a| {
                let name = self.artist_name(&a.artist_id).unwrap_or_else(|| {
                    tracing::warn!(artwork_id = %a.id, "Artwork references unknown artist");
                    crate::constants::UNKNOWN_ARTIST_NAME
                });
                Stop::new(a, name)
            })
            .collect();
        Ok(in_requested_order(ids, found))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.artworks.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::UNKNOWN_ARTIST_NAME;
    use crate::models::Coordinates;

    fn repo() -> (InMemoryArtworkRepository, Vec<Uuid>) {
        let north = Neighborhood {
            id: Uuid::new_v4(),
            name: "Shoreditch".to_string(),
            center: None,
        };
        let south = Neighborhood {
            id: Uuid::new_v4(),
            name: "Brixton".to_string(),
            center: None,
        };
        let artist = Artist {
            id: Uuid::new_v4(),
            name: "Stik".to_string(),
            bio: None,
            image_url: None,
        };
        let artwork = |n: &Neighborhood, artist_id: Uuid| Artwork {
            id: Uuid::new_v4(),
            title: "Figures".to_string(),
            artist_id,
            neighborhood_id: n.id,
            coordinates: Coordinates::new(51.52, -0.07).unwrap(),
            image_url: None,
        };
        let artworks = vec![
            artwork(&north, artist.id),
            artwork(&north, Uuid::new_v4()),
            artwork(&south, artist.id),
        ];
        let ids = vec![north.id, artworks[0].id, artworks[1].id, artworks[2].id];
        (
            InMemoryArtworkRepository::new(vec![north, south], vec![artist], artworks),
            ids,
        )
    }

    #[tokio::test]
    async fn test_neighborhoods_sorted_by_name() {
        let (repo, _) = repo();
        let names: Vec<String> = repo
            .list_neighborhoods()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.name)
            .collect();
        assert_eq!(names, vec!["Brixton", "Shoreditch"]);
    }

    #[tokio::test]
    async fn test_catalog_scoped_to_neighborhood() {
        let (repo, ids) = repo();
        let catalog = repo.load_catalog(ids[0]).await.unwrap();
        assert_eq!(catalog.artworks.len(), 2);
        assert_eq!(catalog.artists.len(), 1);
        assert_eq!(catalog.artist_name(&catalog.artworks[1].artist_id), UNKNOWN_ARTIST_NAME);
    }

    #[tokio::test]
    async fn test_unknown_neighborhood_is_not_found() {
        let (repo, _) = repo();
        let result = repo.load_catalog(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stops_follow_requested_order() {
        let (repo, ids) = repo();
        let stops = repo.find_stops_by_ids(&[ids[3], ids[1], ids[2]]).await.unwrap();
        let found: Vec<Uuid> = stops.iter().map(|s| s.id).collect();
        assert_eq!(found, vec![ids[3], ids[1], ids[2]]);
        assert_eq!(stops[0].artist_name, "Stik");
        assert_eq!(stops[2].artist_name, UNKNOWN_ARTIST_NAME);
        assert_eq!(repo.count().await.unwrap(), 3);
    }
}
