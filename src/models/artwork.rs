use crate::constants::UNKNOWN_ARTIST_NAME;
use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A street-art piece that can become a tour stop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artwork {
    pub id: Uuid,
    pub title: String,
    pub artist_id: Uuid,
    pub neighborhood_id: Uuid,
    pub coordinates: Coordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artist {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Neighborhood {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<Coordinates>,
}

/// The projection of an artwork that a tour carries around.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stop {
    pub id: Uuid,
    pub title: String,
    pub artist_name: String,
    pub coordinates: Coordinates,
}

impl Stop {
    pub fn new(artwork: &Artwork, artist_name: &str) -> Self {
        Stop {
            id: artwork.id,
            title: artwork.title.clone(),
            artist_name: artist_name.to_string(),
            coordinates: artwork.coordinates,
        }
    }
}

/// Everything the tour builder needs to know about one neighborhood.
#[derive(Debug, Clone, Serialize)]
pub struct NeighborhoodCatalog {
    pub neighborhood: Neighborhood,
    pub artworks: Vec<Artwork>,
    pub artists: HashMap<Uuid, Artist>,
}

impl NeighborhoodCatalog {
    pub fn new(neighborhood: Neighborhood, artworks: Vec<Artwork>, artists: Vec<Artist>) -> Self {
        NeighborhoodCatalog {
            neighborhood,
            artworks,
            artists: artists.into_iter().map(|a| (a.id, a)).collect(),
        }
    }

    pub fn artist_name(&self, artist_id: &Uuid) -> &str {
        match self.artists.get(artist_id) {
            Some(artist) => &artist.name,
            None => {
                tracing::warn!(
                    artist_id = %artist_id,
                    neighborhood = %self.neighborhood.name,
                    "Artwork references unknown artist"
                );
                UNKNOWN_ARTIST_NAME
            }
        }
    }

    pub fn stop_for(&self, artwork: &Artwork) -> Stop {
        Stop::new(artwork, self.artist_name(&artwork.artist_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artwork(artist_id: Uuid) -> Artwork {
        Artwork {
            id: Uuid::new_v4(),
            title: "Blue Whale".to_string(),
            artist_id,
            neighborhood_id: Uuid::new_v4(),
            coordinates: Coordinates::new(52.4986, 13.4181).unwrap(),
            image_url: None,
        }
    }

    #[test]
    fn test_stop_projection() {
        let artist = Artist {
            id: Uuid::new_v4(),
            name: "Blu".to_string(),
            bio: None,
            image_url: None,
        };
        let piece = artwork(artist.id);
        let hood = Neighborhood {
            id: piece.neighborhood_id,
            name: "Kreuzberg".to_string(),
            center: None,
        };
        let catalog = NeighborhoodCatalog::new(hood, vec![piece.clone()], vec![artist]);

        let stop = catalog.stop_for(&piece);
        assert_eq!(stop.id, piece.id);
        assert_eq!(stop.title, "Blue Whale");
        assert_eq!(stop.artist_name, "Blu");
        assert_eq!(stop.coordinates, piece.coordinates);
    }

    #[test]
    fn test_unknown_artist_fallback() {
        let piece = artwork(Uuid::new_v4());
        let hood = Neighborhood {
            id: piece.neighborhood_id,
            name: "Kreuzberg".to_string(),
            center: None,
        };
        let catalog = NeighborhoodCatalog::new(hood, vec![piece.clone()], vec![]);
        assert_eq!(catalog.stop_for(&piece).artist_name, UNKNOWN_ARTIST_NAME);
    }
}
