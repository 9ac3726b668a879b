use crate::models::{CandidateSource, Coordinates, DistanceKm, PlainDirections, Stop, TourSelection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The ordering strategy behind a tour variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariationKind {
    /// Greedy nearest-neighbour walk
    Compact,
    /// Round-robin across artists
    Diverse,
    /// Placeholder until there is a ranking signal: random order
    Popular,
}

impl VariationKind {
    pub const ALL: [VariationKind; 3] = [
        VariationKind::Compact,
        VariationKind::Diverse,
        VariationKind::Popular,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            VariationKind::Compact => "Shortest Walk",
            VariationKind::Diverse => "Artist Mix",
            VariationKind::Popular => "Crowd Favourites",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            VariationKind::Compact => {
                "Each stop is the closest remaining artwork, keeping the walk short."
            }
            VariationKind::Diverse => {
                "Rotates between artists so you see as many different artists as possible."
            }
            VariationKind::Popular => {
                "A selection of favourite pieces in the area, in a random order."
            }
        }
    }
}

impl fmt::Display for VariationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariationKind::Compact => write!(f, "compact"),
            VariationKind::Diverse => write!(f, "diverse"),
            VariationKind::Popular => write!(f, "popular"),
        }
    }
}

impl FromStr for VariationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(VariationKind::Compact),
            "diverse" => Ok(VariationKind::Diverse),
            "popular" => Ok(VariationKind::Popular),
            _ => Err(format!("Invalid variation: '{}'", s)),
        }
    }
}

/// Walking figures reported by the directions provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub walking_minutes: u32,
    pub distance_km: DistanceKm,
    /// Walking plus viewing time at every stop
    pub total_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum VariationStatus {
    /// Directions not requested yet
    Pending,
    Resolved,
    /// Directions could not be obtained; the variation cannot be selected
    Unresolved { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourVariation {
    pub kind: VariationKind,
    pub name: String,
    pub description: String,
    pub stops: Vec<Stop>,
    pub status: VariationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<RouteEstimate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directions: Option<PlainDirections>,
}

impl TourVariation {
    pub fn new(kind: VariationKind, stops: Vec<Stop>) -> Self {
        TourVariation {
            kind,
            name: kind.display_name().to_string(),
            description: kind.description().to_string(),
            stops,
            status: VariationStatus::Pending,
            estimate: None,
            directions: None,
        }
    }

    /// Attach the provider's answer. Only called once per variation.
    pub fn resolve(&mut self, directions: PlainDirections, estimate: RouteEstimate) {
        self.directions = Some(directions);
        self.estimate = Some(estimate);
        self.status = VariationStatus::Resolved;
    }

    pub fn mark_unresolved(&mut self, reason: impl Into<String>) {
        self.directions = None;
        self.estimate = None;
        self.status = VariationStatus::Unresolved {
            reason: reason.into(),
        };
    }

    /// Unresolved variations stay visible but cannot be picked
    pub fn is_selectable(&self) -> bool {
        !matches!(self.status, VariationStatus::Unresolved { .. })
    }
}

// Request/Response types for API endpoints

#[derive(Debug, Deserialize)]
pub struct GenerateToursRequest {
    pub selection: TourSelection,
    #[serde(default)]
    pub origin: Option<Coordinates>,
    #[serde(default)]
    pub with_directions: bool,
    /// Start from this session's last reported position when `origin` is absent
    #[serde(default)]
    pub session: Option<Uuid>,
}

impl GenerateToursRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_points(self.origin, &self.selection.confirmed_stops)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TourPlanResponse {
    pub max_stops: usize,
    pub candidate_source: CandidateSource,
    pub candidate_count: usize,
    /// The "surprise me" pick: the pool cut down to the stop budget
    pub preview: Vec<Stop>,
    pub variations: Vec<TourVariation>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsEnrichRequest {
    pub variations: Vec<TourVariation>,
    #[serde(default)]
    pub origin: Option<Coordinates>,
}

impl DirectionsEnrichRequest {
    pub fn validate(&self) -> Result<(), String> {
        self.variations
            .iter()
            .try_for_each(|v| validate_points(self.origin, &v.stops))
    }
}

/// Client-supplied positions are checked before they reach the provider
pub fn validate_points(origin: Option<Coordinates>, stops: &[Stop]) -> Result<(), String> {
    if let Some(origin) = origin {
        origin.validate().map_err(|e| format!("origin: {}", e))?;
    }
    for stop in stops {
        stop.coordinates
            .validate()
            .map_err(|e| format!("stop {}: {}", stop.id, e))?;
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VariationsResponse {
    pub variations: Vec<TourVariation>,
}
