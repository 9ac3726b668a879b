//! Provider-native directions model and the boundary around it.
//!
//! Responses arrive from the provider as [`NativeDirections`]: a tree whose
//! coordinates are [`LatLngSource`]s, which may be plain numbers or accessors
//! depending on where the object came from. Business logic never reads those
//! directly; [`boundary::to_plain`] normalizes everything into
//! [`PlainDirections`](crate::models::PlainDirections) first.

pub mod boundary;
pub mod polyline;
pub mod reconciliation;

use crate::error::Result;
use crate::models::{Coordinates, Stop};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

pub use boundary::{to_native, to_plain};
pub use reconciliation::{reconcile, Reconciliation, StepArrival};

type Accessor = Arc<dyn Fn() -> f64 + Send + Sync>;

/// A coordinate whose components may need to be called to be read.
#[derive(Clone)]
pub enum LatLngSource {
    Value { lat: f64, lng: f64 },
    Accessor { lat: Accessor, lng: Accessor },
}

impl LatLngSource {
    pub fn value(coordinates: Coordinates) -> Self {
        LatLngSource::Value {
            lat: coordinates.lat,
            lng: coordinates.lng,
        }
    }

    /// Wrap a numeric pair the way the map widget expects to receive it
    pub fn accessor(coordinates: Coordinates) -> Self {
        let Coordinates { lat, lng } = coordinates;
        LatLngSource::Accessor {
            lat: Arc::new(move || lat),
            lng: Arc::new(move || lng),
        }
    }

    /// The single place coordinate sources are read
    pub fn normalize(&self) -> Coordinates {
        match self {
            LatLngSource::Value { lat, lng } => Coordinates {
                lat: *lat,
                lng: *lng,
            },
            LatLngSource::Accessor { lat, lng } => Coordinates {
                lat: lat(),
                lng: lng(),
            },
        }
    }
}

impl fmt::Debug for LatLngSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatLngSource::Value { lat, lng } => write!(f, "Value({}, {})", lat, lng),
            LatLngSource::Accessor { .. } => {
                let c = self.normalize();
                write!(f, "Accessor({}, {})", c.lat, c.lng)
            }
        }
    }
}

/// What was asked of the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRequest {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub waypoints: Vec<Coordinates>,
    pub optimize_waypoints: bool,
}

impl DirectionsRequest {
    /// Route through `stops` in order, starting from `origin` when the user's
    /// position is known and from the first stop otherwise.
    /// Returns `None` when fewer than two points remain to route between.
    pub fn for_stops(
        stops: &[Stop],
        origin: Option<Coordinates>,
        optimize_waypoints: bool,
    ) -> Option<Self> {
        let mut points: Vec<Coordinates> = Vec::with_capacity(stops.len() + 1);
        points.extend(origin);
        points.extend(stops.iter().map(|s| s.coordinates));

        if points.len() < 2 {
            return None;
        }

        let origin = points[0];
        let destination = points[points.len() - 1];
        let waypoints = points[1..points.len() - 1].to_vec();

        Some(DirectionsRequest {
            origin,
            destination,
            waypoints,
            optimize_waypoints,
        })
    }

    /// Origin, waypoints, destination
    pub fn coordinates(&self) -> Vec<Coordinates> {
        let mut all = Vec::with_capacity(self.waypoints.len() + 2);
        all.push(self.origin);
        all.extend(self.waypoints.iter().copied());
        all.push(self.destination);
        all
    }
}

#[derive(Debug, Clone)]
pub struct NativeDirections {
    pub routes: Vec<NativeRoute>,
    pub geocoded_waypoints: Vec<NativeWaypoint>,
    /// Echo of the originating request; never crosses the plain boundary
    pub request: Option<DirectionsRequest>,
}

#[derive(Debug, Clone)]
pub struct NativeRoute {
    pub bounds: NativeBounds,
    pub legs: Vec<NativeLeg>,
    pub overview_polyline: String,
    pub overview_path: Vec<LatLngSource>,
    pub summary: String,
    pub warnings: Vec<String>,
    pub waypoint_order: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct NativeBounds {
    pub northeast: LatLngSource,
    pub southwest: LatLngSource,
}

#[derive(Debug, Clone)]
pub struct NativeLeg {
    pub start_location: LatLngSource,
    pub end_location: LatLngSource,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub steps: Vec<NativeStep>,
}

#[derive(Debug, Clone)]
pub struct NativeStep {
    pub start_location: LatLngSource,
    pub end_location: LatLngSource,
    pub instructions: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub polyline: String,
    pub path: Vec<LatLngSource>,
    pub travel_mode: String,
    pub maneuver: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NativeWaypoint {
    pub name: String,
    pub location: LatLngSource,
}

/// Anything that can answer a walking directions request.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn walking_directions(&self, request: &DirectionsRequest) -> Result<NativeDirections>;
}
