pub mod artwork;
pub mod coordinates;
pub mod directions;
pub mod distance;
pub mod draft;
pub mod selection;
pub mod tour;

pub use artwork::{Artist, Artwork, Neighborhood, NeighborhoodCatalog, Stop};
pub use coordinates::Coordinates;
pub use directions::{
    DirectionsValidationError, GeocodedWaypoint, PlainBounds, PlainDirections, PlainLeg,
    PlainRoute, PlainStep,
};
pub use distance::{DistanceKm, DistanceMeters};
pub use draft::{DraftHistory, HistoryEntry, TourDraft};
pub use selection::{CandidateSource, Selection, SelectionAction, SelectionToggle, TourSelection};
pub use tour::{RouteEstimate, TourPlanResponse, TourVariation, VariationKind, VariationStatus};
