use crate::constants::TOUR_LENGTH_OPTIONS;
use crate::models::Stop;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A pick over artists or artworks: either "surprise me" or an explicit set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    Wildcard,
    Explicit(BTreeSet<Uuid>),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Explicit(BTreeSet::new())
    }
}

/// What the user tapped: the "surprise me" chip or a concrete item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionToggle {
    Wildcard,
    Id(Uuid),
}

impl Selection {
    pub fn toggle(&self, toggle: SelectionToggle) -> Selection {
        match (self, toggle) {
            (Selection::Wildcard, SelectionToggle::Wildcard) => Selection::default(),
            (Selection::Explicit(_), SelectionToggle::Wildcard) => Selection::Wildcard,
            (Selection::Wildcard, SelectionToggle::Id(id)) => {
                Selection::Explicit(BTreeSet::from([id]))
            }
            (Selection::Explicit(ids), SelectionToggle::Id(id)) => {
                let mut ids = ids.clone();
                if !ids.remove(&id) {
                    ids.insert(id);
                }
                Selection::Explicit(ids)
            }
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Selection::Wildcard)
    }

    /// Explicit members, or `None` for the wildcard
    pub fn ids(&self) -> Option<&BTreeSet<Uuid>> {
        match self {
            Selection::Wildcard => None,
            Selection::Explicit(ids) => Some(ids),
        }
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.ids().is_some_and(|ids| ids.contains(id))
    }
}

/// Which assembler produces the candidate pool for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Artists and artworks both wildcarded
    Neighborhood,
    /// Artists wildcarded, artworks picked explicitly
    ExplicitArtworks,
    /// Artworks wildcarded, artists picked explicitly
    ExplicitArtists,
    /// Nothing wildcarded: the user's own ordered stop list
    ConfirmedStops,
}

impl CandidateSource {
    pub fn is_randomized(&self) -> bool {
        !matches!(self, CandidateSource::ConfirmedStops)
    }
}

fn default_tour_length() -> u32 {
    TOUR_LENGTH_OPTIONS[1]
}

/// The user's in-progress choices on the tour builder screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourSelection {
    #[serde(default)]
    pub neighborhood_id: Option<Uuid>,
    #[serde(default)]
    pub artists: Selection,
    #[serde(default)]
    pub artworks: Selection,
    #[serde(default)]
    pub confirmed_stops: Vec<Stop>,
    #[serde(default = "default_tour_length")]
    pub tour_length_minutes: u32,
}

impl Default for TourSelection {
    fn default() -> Self {
        TourSelection {
            neighborhood_id: None,
            artists: Selection::default(),
            artworks: Selection::default(),
            confirmed_stops: Vec::new(),
            tour_length_minutes: default_tour_length(),
        }
    }
}

impl TourSelection {
    pub fn validate(&self) -> Result<(), String> {
        if !TOUR_LENGTH_OPTIONS.contains(&self.tour_length_minutes) {
            return Err(format!(
                "tour_length_minutes must be one of {:?}",
                TOUR_LENGTH_OPTIONS
            ));
        }
        Ok(())
    }

    /// Picking a new neighborhood invalidates every choice made inside the old one
    pub fn select_neighborhood(&mut self, neighborhood_id: Uuid) {
        if self.neighborhood_id != Some(neighborhood_id) {
            self.artists = Selection::default();
            self.artworks = Selection::default();
            self.confirmed_stops.clear();
        }
        self.neighborhood_id = Some(neighborhood_id);
    }

    /// Changing artists always resets the artwork picks and confirmed stops
    pub fn toggle_artist(&mut self, toggle: SelectionToggle) {
        self.artists = self.artists.toggle(toggle);
        self.artworks = Selection::default();
        self.confirmed_stops.clear();
    }

    pub fn toggle_artwork(&mut self, toggle: SelectionToggle) {
        self.artworks = self.artworks.toggle(toggle);
    }

    pub fn confirm_stops(&mut self, stops: Vec<Stop>) {
        self.confirmed_stops = stops;
    }

    pub fn candidate_source(&self) -> CandidateSource {
        match (self.artists.is_wildcard(), self.artworks.is_wildcard()) {
            (true, true) => CandidateSource::Neighborhood,
            (true, false) => CandidateSource::ExplicitArtworks,
            (false, true) => CandidateSource::ExplicitArtists,
            (false, false) => CandidateSource::ConfirmedStops,
        }
    }
}

/// A single edit to a stored [`TourSelection`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SelectionAction {
    SelectNeighborhood { neighborhood_id: Uuid },
    ToggleArtist { toggle: SelectionToggle },
    ToggleArtwork { toggle: SelectionToggle },
    /// Artwork ids in the order the user arranged them
    ConfirmStops { artwork_ids: Vec<Uuid> },
    SetTourLength { minutes: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;

    fn explicit(ids: &[Uuid]) -> Selection {
        Selection::Explicit(ids.iter().copied().collect())
    }

    #[test]
    fn test_wildcard_replaces_explicit_members() {
        let a = Uuid::new_v4();
        let s = explicit(&[a]).toggle(SelectionToggle::Wildcard);
        assert_eq!(s, Selection::Wildcard);
    }

    #[test]
    fn test_wildcard_toggle_off_empties() {
        let s = Selection::Wildcard.toggle(SelectionToggle::Wildcard);
        assert_eq!(s, Selection::Explicit(BTreeSet::new()));
    }

    #[test]
    fn test_concrete_pick_clears_wildcard() {
        let a = Uuid::new_v4();
        let s = Selection::Wildcard.toggle(SelectionToggle::Id(a));
        assert_eq!(s, explicit(&[a]));
        assert!(!s.is_wildcard());
    }

    #[test]
    fn test_concrete_toggle_flips_membership() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let s = explicit(&[a]).toggle(SelectionToggle::Id(b));
        assert!(s.contains(&a) && s.contains(&b));
        let s = s.toggle(SelectionToggle::Id(a));
        assert!(!s.contains(&a) && s.contains(&b));
    }

    #[test]
    fn test_double_toggle_restores_set() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let start = explicit(&[a, b]);
        for id in [a, b, Uuid::new_v4()] {
            let toggle = SelectionToggle::Id(id);
            assert_eq!(start.toggle(toggle).toggle(toggle), start);
        }

        for start in [Selection::Wildcard, Selection::default()] {
            let toggle = SelectionToggle::Wildcard;
            assert_eq!(start.toggle(toggle).toggle(toggle), start);
        }
    }

    #[test]
    fn test_toggle_artist_resets_artworks_and_stops() {
        let mut selection = TourSelection {
            artworks: explicit(&[Uuid::new_v4()]),
            confirmed_stops: vec![Stop {
                id: Uuid::new_v4(),
                title: "Mural".to_string(),
                artist_name: "Someone".to_string(),
                coordinates: Coordinates::new(0.0, 0.0).unwrap(),
            }],
            ..TourSelection::default()
        };

        selection.toggle_artist(SelectionToggle::Wildcard);
        assert!(selection.artists.is_wildcard());
        assert_eq!(selection.artworks, Selection::default());
        assert!(selection.confirmed_stops.is_empty());
    }

    #[test]
    fn test_select_same_neighborhood_keeps_choices() {
        let hood = Uuid::new_v4();
        let mut selection = TourSelection::default();
        selection.select_neighborhood(hood);
        selection.toggle_artist(SelectionToggle::Wildcard);

        selection.select_neighborhood(hood);
        assert!(selection.artists.is_wildcard());

        selection.select_neighborhood(Uuid::new_v4());
        assert!(!selection.artists.is_wildcard());
    }

    #[test]
    fn test_candidate_source_paths() {
        let mut selection = TourSelection::default();
        assert_eq!(selection.candidate_source(), CandidateSource::ConfirmedStops);

        selection.artworks = Selection::Wildcard;
        assert_eq!(selection.candidate_source(), CandidateSource::ExplicitArtists);

        selection.artists = Selection::Wildcard;
        assert_eq!(selection.candidate_source(), CandidateSource::Neighborhood);

        selection.artworks = Selection::default();
        assert_eq!(selection.candidate_source(), CandidateSource::ExplicitArtworks);
    }

    #[test]
    fn test_tour_length_menu() {
        let mut selection = TourSelection::default();
        assert!(selection.validate().is_ok());
        selection.tour_length_minutes = 45;
        assert!(selection.validate().is_err());
    }

    #[test]
    fn test_selection_serialization() {
        let id = Uuid::new_v4();
        assert_eq!(
            serde_json::to_value(Selection::Wildcard).unwrap(),
            serde_json::json!("wildcard")
        );
        let json = serde_json::to_value(explicit(&[id])).unwrap();
        assert_eq!(json, serde_json::json!({ "explicit": [id] }));

        let action: SelectionAction = serde_json::from_value(serde_json::json!({
            "action": "toggle_artist",
            "toggle": { "id": id }
        }))
        .unwrap();
        assert!(matches!(
            action,
            SelectionAction::ToggleArtist { toggle: SelectionToggle::Id(x) } if x == id
        ));
    }
}
