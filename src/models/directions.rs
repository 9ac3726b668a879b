//! Plain-data mirror of a directions response.
//!
//! This is the form that crosses storage and navigation boundaries: every
//! coordinate is a numeric `{lat, lng}` pair and nothing in the tree refers
//! back to the provider. [`PlainDirections::validate`] is the structural gate
//! every converted response must pass.

use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainDirections {
    pub routes: Vec<PlainRoute>,
    pub geocoded_waypoints: Vec<GeocodedWaypoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainRoute {
    pub bounds: PlainBounds,
    pub legs: Vec<PlainLeg>,
    pub overview_polyline: String,
    #[serde(default)]
    pub overview_path: Vec<Coordinates>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Visiting order of the intermediate waypoints as the provider chose it
    #[serde(default)]
    pub waypoint_order: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlainBounds {
    pub northeast: Coordinates,
    pub southwest: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainLeg {
    pub start_location: Coordinates,
    pub end_location: Coordinates,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub steps: Vec<PlainStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainStep {
    pub start_location: Coordinates,
    pub end_location: Coordinates,
    pub instructions: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub polyline: String,
    #[serde(default)]
    pub path: Vec<Coordinates>,
    pub travel_mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maneuver: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedWaypoint {
    pub name: String,
    pub location: Coordinates,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DirectionsValidationError {
    #[error("malformed directions response: {0}")]
    Malformed(String),

    #[error("{path}: coordinate is not a finite number")]
    NonFinite { path: String },

    #[error("{path}: latitude {value} outside [-90, 90]")]
    LatitudeOutOfRange { path: String, value: f64 },

    #[error("{path}: longitude {value} outside [-180, 180]")]
    LongitudeOutOfRange { path: String, value: f64 },

    #[error("{path}: northeast bound lies south of southwest bound")]
    InvertedBounds { path: String },

    #[error("{path}: route has no legs")]
    NoLegs { path: String },

    #[error("directions response contains no routes")]
    NoRoutes,

    #[error("directions response has no geocoded waypoints")]
    NoGeocodedWaypoints,
}

impl DirectionsValidationError {
    /// Location of the offending field, `$` for whole-document problems
    pub fn path(&self) -> &str {
        match self {
            DirectionsValidationError::NonFinite { path }
            | DirectionsValidationError::LatitudeOutOfRange { path, .. }
            | DirectionsValidationError::LongitudeOutOfRange { path, .. }
            | DirectionsValidationError::InvertedBounds { path }
            | DirectionsValidationError::NoLegs { path } => path,
            DirectionsValidationError::Malformed(_)
            | DirectionsValidationError::NoRoutes
            | DirectionsValidationError::NoGeocodedWaypoints => "$",
        }
    }
}

type Validation = Result<(), DirectionsValidationError>;

fn check_coordinates(path: &str, c: &Coordinates) -> Validation {
    if !c.lat.is_finite() || !c.lng.is_finite() {
        return Err(DirectionsValidationError::NonFinite {
            path: path.to_string(),
        });
    }
    if !(-90.0..=90.0).contains(&c.lat) {
        return Err(DirectionsValidationError::LatitudeOutOfRange {
            path: format!("{path}.lat"),
            value: c.lat,
        });
    }
    if !(-180.0..=180.0).contains(&c.lng) {
        return Err(DirectionsValidationError::LongitudeOutOfRange {
            path: format!("{path}.lng"),
            value: c.lng,
        });
    }
    Ok(())
}

fn check_path(path: &str, points: &[Coordinates]) -> Validation {
    for (i, point) in points.iter().enumerate() {
        check_coordinates(&format!("{path}[{i}]"), point)?;
    }
    Ok(())
}

impl PlainDirections {
    /// Parse untrusted JSON (e.g. a stored draft) and validate it
    pub fn from_value(value: serde_json::Value) -> Result<Self, DirectionsValidationError> {
        let directions: PlainDirections = serde_json::from_value(value)
            .map_err(|e| DirectionsValidationError::Malformed(e.to_string()))?;
        directions.validate()?;
        Ok(directions)
    }

    pub fn validate(&self) -> Validation {
        if self.routes.is_empty() {
            return Err(DirectionsValidationError::NoRoutes);
        }
        if self.geocoded_waypoints.is_empty() {
            return Err(DirectionsValidationError::NoGeocodedWaypoints);
        }

        for (r, route) in self.routes.iter().enumerate() {
            let route_path = format!("routes[{r}]");
            route.validate(&route_path)?;
        }

        for (w, waypoint) in self.geocoded_waypoints.iter().enumerate() {
            check_coordinates(
                &format!("geocoded_waypoints[{w}].location"),
                &waypoint.location,
            )?;
        }

        Ok(())
    }
}

impl PlainRoute {
    fn validate(&self, path: &str) -> Validation {
        check_coordinates(&format!("{path}.bounds.northeast"), &self.bounds.northeast)?;
        check_coordinates(&format!("{path}.bounds.southwest"), &self.bounds.southwest)?;
        if self.bounds.northeast.lat < self.bounds.southwest.lat {
            return Err(DirectionsValidationError::InvertedBounds {
                path: format!("{path}.bounds"),
            });
        }

        check_path(&format!("{path}.overview_path"), &self.overview_path)?;

        if self.legs.is_empty() {
            return Err(DirectionsValidationError::NoLegs {
                path: path.to_string(),
            });
        }

        for (l, leg) in self.legs.iter().enumerate() {
            let leg_path = format!("{path}.legs[{l}]");
            check_coordinates(&format!("{leg_path}.start_location"), &leg.start_location)?;
            check_coordinates(&format!("{leg_path}.end_location"), &leg.end_location)?;

            for (s, step) in leg.steps.iter().enumerate() {
                let step_path = format!("{leg_path}.steps[{s}]");
                check_coordinates(&format!("{step_path}.start_location"), &step.start_location)?;
                check_coordinates(&format!("{step_path}.end_location"), &step.end_location)?;
                check_path(&format!("{step_path}.path"), &step.path)?;
            }
        }

        Ok(())
    }

    pub fn distance_meters(&self) -> f64 {
        self.legs.iter().map(|leg| leg.distance_meters).sum()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.legs.iter().map(|leg| leg.duration_seconds).sum()
    }
}
