use crate::constants::{
    MAPBOX_MAX_DIRECTIONS_COORDINATES, MAPBOX_MAX_OPTIMIZED_COORDINATES, POLYLINE_PRECISION,
};
use crate::error::{AppError, Result};
use crate::models::Coordinates;
use crate::services::directions::{
    polyline, DirectionsProvider, DirectionsRequest, LatLngSource, NativeBounds, NativeDirections,
    NativeLeg, NativeRoute, NativeStep, NativeWaypoint,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const MAPBOX_API_BASE_URL: &str = "https://api.mapbox.com";
const WALKING_PROFILE: &str = "mapbox/walking";

/// How the client authenticates with the directions API.
#[derive(Clone, Debug)]
pub enum AuthMode {
    /// Send `access_token` query param (direct Mapbox).
    DirectToken,
    /// Proxy mode: send `Authorization: Bearer` header.
    BearerHeader,
}

#[derive(Clone)]
pub struct MapboxClient {
    client: Client,
    api_key: String,
    base_url: String,
    auth_mode: AuthMode,
}

impl MapboxClient {
    pub fn new(api_key: String) -> Self {
        MapboxClient {
            client: Client::new(),
            api_key,
            base_url: MAPBOX_API_BASE_URL.to_string(),
            auth_mode: AuthMode::DirectToken,
        }
    }

    pub fn with_config(api_key: String, base_url: String, auth_mode: AuthMode) -> Self {
        MapboxClient {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_mode,
        }
    }

    fn endpoint(&self, request: &DirectionsRequest) -> String {
        let coordinates_str = request
            .coordinates()
            .iter()
            .map(|c| format!("{},{}", c.lng, c.lat))
            .collect::<Vec<_>>()
            .join(";");

        let service = if request.optimize_waypoints {
            "optimized-trips/v1"
        } else {
            "directions/v5"
        };

        format!(
            "{}/{}/{}/{}",
            self.base_url, service, WALKING_PROFILE, coordinates_str
        )
    }

    async fn fetch(&self, request: &DirectionsRequest) -> Result<String> {
        let count = request.coordinates().len();
        let limit = if request.optimize_waypoints {
            MAPBOX_MAX_OPTIMIZED_COORDINATES
        } else {
            MAPBOX_MAX_DIRECTIONS_COORDINATES
        };
        if count > limit {
            return Err(AppError::InvalidRequest(format!(
                "Maximum {} coordinates allowed, got {}",
                limit, count
            )));
        }

        tracing::debug!(
            coordinates = count,
            optimize = request.optimize_waypoints,
            "Mapbox API request: {} coordinates",
            count
        );

        let mut http = self.client.get(self.endpoint(request)).query(&[
            ("geometries", "geojson"),
            ("overview", "full"),
            ("steps", "true"),
        ]);

        if request.optimize_waypoints {
            http = http.query(&[
                ("source", "first"),
                ("destination", "last"),
                ("roundtrip", "false"),
            ]);
        }

        match self.auth_mode {
            AuthMode::DirectToken => {
                http = http.query(&[("access_token", &self.api_key)]);
            }
            AuthMode::BearerHeader => {
                http = http.bearer_auth(&self.api_key);
            }
        }

        let response = http
            .send()
            .await
            .map_err(|e| AppError::MapboxApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                coordinates = count,
                "Mapbox API HTTP error {}: {}",
                status, error_text
            );
            return Err(AppError::MapboxApi(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::MapboxApi(format!("Failed to read response: {}", e)))
    }
}

#[async_trait]
impl DirectionsProvider for MapboxClient {
    async fn walking_directions(&self, request: &DirectionsRequest) -> Result<NativeDirections> {
        let request = within_service_limits(request);
        let body = self.fetch(&request).await?;
        parse_response(&body, &request)
    }
}

/// The optimization service takes fewer coordinates than plain directions.
/// Longer tours keep their generated order and use the directions service.
fn within_service_limits(request: &DirectionsRequest) -> DirectionsRequest {
    let count = request.coordinates().len();
    let mut request = request.clone();
    if request.optimize_waypoints && count > MAPBOX_MAX_OPTIMIZED_COORDINATES {
        tracing::debug!(
            coordinates = count,
            limit = MAPBOX_MAX_OPTIMIZED_COORDINATES,
            "Too many stops to optimize, keeping generated order"
        );
        request.optimize_waypoints = false;
    }
    request
}

/// Map a Directions or Optimization response body into the native model.
pub fn parse_response(body: &str, request: &DirectionsRequest) -> Result<NativeDirections> {
    let response: MapboxApiResponse = serde_json::from_str(body)
        .map_err(|e| AppError::MapboxApi(format!("Failed to parse response: {}", e)))?;

    if response.code != "Ok" {
        return Err(AppError::MapboxApi(format!(
            "{}: {}",
            response.code,
            response.message.unwrap_or_default()
        )));
    }

    if response.routes.is_empty() {
        tracing::warn!(
            coordinates = request.coordinates().len(),
            "Mapbox returned 0 routes"
        );
        return Err(AppError::MapboxApi("No routes found".to_string()));
    }

    let visited = visit_order(&response.waypoints, request);
    let waypoint_order: Vec<usize> = if request.optimize_waypoints && visited.len() > 2 {
        // Input 0 is the fixed start, so intermediate inputs are offset by one
        visited[1..visited.len() - 1]
            .iter()
            .filter_map(|i| i.checked_sub(1))
            .collect()
    } else {
        (0..request.waypoints.len()).collect()
    };

    let requested = request.coordinates();
    let stops: Vec<Coordinates> = visited
        .iter()
        .map(|&i| {
            response
                .waypoints
                .get(i)
                .map(|w| Coordinates::from_lng_lat(w.location))
                .or_else(|| requested.get(i).copied())
                .unwrap_or(request.origin)
        })
        .collect();

    let routes = response
        .routes
        .iter()
        .map(|route| map_route(route, &stops, &requested, waypoint_order.clone()))
        .collect();

    let geocoded_waypoints = response
        .waypoints
        .iter()
        .map(|w| NativeWaypoint {
            name: w.name.clone(),
            location: LatLngSource::value(Coordinates::from_lng_lat(w.location)),
        })
        .collect();

    let first = &response.routes[0];
    tracing::debug!(
        distance_km = %format!("{:.2}", first.distance / 1000.0),
        duration_min = %format!("{:.0}", first.duration / 60.0),
        legs = first.legs.len(),
        "Mapbox response: {:.2}km, {:.0}min",
        first.distance / 1000.0, first.duration / 60.0
    );

    Ok(NativeDirections {
        routes,
        geocoded_waypoints,
        request: Some(request.clone()),
    })
}

/// Input indices in the order they are walked
fn visit_order(waypoints: &[MapboxWaypoint], request: &DirectionsRequest) -> Vec<usize> {
    let count = request.coordinates().len();
    let mut order: Vec<usize> = (0..count).collect();
    if request.optimize_waypoints && waypoints.len() == count {
        order.sort_by_key(|&i| waypoints[i].waypoint_index.unwrap_or(i));
    }
    order
}

fn map_route(
    route: &MapboxRoute,
    stops: &[Coordinates],
    requested: &[Coordinates],
    waypoint_order: Vec<usize>,
) -> NativeRoute {
    let overview: Vec<Coordinates> = route
        .geometry
        .coordinates
        .iter()
        .copied()
        .map(Coordinates::from_lng_lat)
        .collect();

    let (northeast, southwest) = bounds_of(if overview.is_empty() {
        requested
    } else {
        &overview
    });

    let legs = route
        .legs
        .iter()
        .enumerate()
        .map(|(i, leg)| {
            let steps: Vec<NativeStep> = leg.steps.iter().map(map_step).collect();
            let start = steps
                .first()
                .map(|s| s.start_location.normalize())
                .or_else(|| stops.get(i).copied())
                .unwrap_or(northeast);
            let end = steps
                .last()
                .map(|s| s.end_location.normalize())
                .or_else(|| stops.get(i + 1).copied())
                .unwrap_or(start);
            NativeLeg {
                start_location: LatLngSource::value(start),
                end_location: LatLngSource::value(end),
                distance_meters: leg.distance,
                duration_seconds: leg.duration,
                steps,
            }
        })
        .collect();

    let summary = route
        .legs
        .iter()
        .map(|l| l.summary.as_str())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    NativeRoute {
        bounds: NativeBounds {
            northeast: LatLngSource::value(northeast),
            southwest: LatLngSource::value(southwest),
        },
        legs,
        overview_polyline: polyline::encode(&overview, POLYLINE_PRECISION),
        overview_path: overview.into_iter().map(LatLngSource::value).collect(),
        summary,
        warnings: Vec::new(),
        waypoint_order,
    }
}

fn map_step(step: &MapboxStep) -> NativeStep {
    let path: Vec<Coordinates> = step
        .geometry
        .coordinates
        .iter()
        .copied()
        .map(Coordinates::from_lng_lat)
        .collect();
    let start = Coordinates::from_lng_lat(step.maneuver.location);
    let end = path.last().copied().unwrap_or(start);

    let maneuver = match step.maneuver.modifier {
        Some(ref modifier) => format!("{}-{}", step.maneuver.kind, modifier.replace(' ', "-")),
        None => step.maneuver.kind.clone(),
    };

    NativeStep {
        start_location: LatLngSource::value(start),
        end_location: LatLngSource::value(end),
        instructions: step.maneuver.instruction.clone(),
        distance_meters: step.distance,
        duration_seconds: step.duration,
        polyline: polyline::encode(&path, POLYLINE_PRECISION),
        path: path.into_iter().map(LatLngSource::value).collect(),
        travel_mode: step.mode.to_uppercase(),
        maneuver: Some(maneuver),
    }
}

/// (northeast, southwest)
fn bounds_of(points: &[Coordinates]) -> (Coordinates, Coordinates) {
    let mut northeast = Coordinates {
        lat: f64::MIN,
        lng: f64::MIN,
    };
    let mut southwest = Coordinates {
        lat: f64::MAX,
        lng: f64::MAX,
    };
    for p in points {
        northeast.lat = northeast.lat.max(p.lat);
        northeast.lng = northeast.lng.max(p.lng);
        southwest.lat = southwest.lat.min(p.lat);
        southwest.lng = southwest.lng.min(p.lng);
    }
    (northeast, southwest)
}

// Mapbox API response types

#[derive(Debug, Deserialize)]
struct MapboxApiResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    /// Optimization responses call these trips
    #[serde(default, alias = "trips")]
    routes: Vec<MapboxRoute>,
    #[serde(default)]
    waypoints: Vec<MapboxWaypoint>,
}

#[derive(Debug, Deserialize)]
struct MapboxRoute {
    distance: f64, // meters
    duration: f64, // seconds
    geometry: MapboxGeometry,
    #[serde(default)]
    legs: Vec<MapboxLeg>,
}

#[derive(Debug, Deserialize)]
struct MapboxLeg {
    distance: f64,
    duration: f64,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    steps: Vec<MapboxStep>,
}

#[derive(Debug, Deserialize)]
struct MapboxStep {
    distance: f64,
    duration: f64,
    geometry: MapboxGeometry,
    #[serde(default = "default_mode")]
    mode: String,
    maneuver: MapboxManeuver,
}

fn default_mode() -> String {
    "walking".to_string()
}

#[derive(Debug, Deserialize)]
struct MapboxManeuver {
    location: [f64; 2], // [lng, lat]
    #[serde(default)]
    instruction: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    modifier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MapboxGeometry {
    coordinates: Vec<[f64; 2]>, // [lng, lat] pairs
}

#[derive(Debug, Deserialize)]
struct MapboxWaypoint {
    #[serde(default)]
    name: String,
    location: [f64; 2],
    /// Position in the optimized trip
    #[serde(default)]
    waypoint_index: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(optimize: bool) -> DirectionsRequest {
        DirectionsRequest {
            origin: Coordinates::new(40.0, -74.0).unwrap(),
            destination: Coordinates::new(40.002, -74.0).unwrap(),
            waypoints: vec![
                Coordinates::new(40.001, -74.0).unwrap(),
                Coordinates::new(40.001, -74.001).unwrap(),
            ],
            optimize_waypoints: optimize,
        }
    }

    #[test]
    fn test_new_defaults_to_direct_token() {
        let client = MapboxClient::new("pk.test123".to_string());
        assert_eq!(client.base_url, MAPBOX_API_BASE_URL);
        assert!(matches!(client.auth_mode, AuthMode::DirectToken));
    }

    #[test]
    fn test_with_config_bearer_mode() {
        let client = MapboxClient::with_config(
            "my-key".to_string(),
            "http://localhost:4000/".to_string(),
            AuthMode::BearerHeader,
        );
        assert_eq!(client.base_url, "http://localhost:4000");
        assert!(matches!(client.auth_mode, AuthMode::BearerHeader));
    }

    #[test]
    fn test_endpoint_picks_service() {
        let client = MapboxClient::new("pk".to_string());
        let url = client.endpoint(&request(false));
        assert!(url.starts_with("https://api.mapbox.com/directions/v5/mapbox/walking/-74,40;"));

        let url = client.endpoint(&request(true));
        assert!(url.starts_with("https://api.mapbox.com/optimized-trips/v1/mapbox/walking/"));
    }

    #[test]
    fn test_visit_order_follows_waypoint_index() {
        let waypoints: Vec<MapboxWaypoint> = [0, 2, 1, 3]
            .iter()
            .map(|&idx| MapboxWaypoint {
                name: String::new(),
                location: [0.0, 0.0],
                waypoint_index: Some(idx),
            })
            .collect();
        assert_eq!(visit_order(&waypoints, &request(true)), vec![0, 2, 1, 3]);
        assert_eq!(visit_order(&waypoints, &request(false)), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_bounds_of_points() {
        let (ne, sw) = bounds_of(&[
            Coordinates::new(1.0, 5.0).unwrap(),
            Coordinates::new(3.0, 2.0).unwrap(),
        ]);
        assert_eq!(ne, Coordinates::new(3.0, 5.0).unwrap());
        assert_eq!(sw, Coordinates::new(1.0, 2.0).unwrap());
    }

    #[test]
    fn test_long_tours_fall_back_to_directions_service() {
        let client = MapboxClient::new("pk".to_string());
        let long = DirectionsRequest {
            origin: Coordinates::new(40.0, -74.0).unwrap(),
            destination: Coordinates::new(40.02, -74.0).unwrap(),
            waypoints: (1..19)
                .map(|i| Coordinates::new(40.0 + i as f64 * 0.001, -74.0).unwrap())
                .collect(),
            optimize_waypoints: true,
        };
        assert_eq!(long.coordinates().len(), 20);

        let routed = within_service_limits(&long);
        assert!(!routed.optimize_waypoints);
        assert!(client
            .endpoint(&routed)
            .starts_with("https://api.mapbox.com/directions/v5/"));

        // Short tours are still optimized
        assert!(within_service_limits(&request(true)).optimize_waypoints);
    }

    #[test]
    fn test_start_in_middle_of_trip_does_not_underflow() {
        let body = r#"{
            "code": "Ok",
            "trips": [{"distance": 10.0, "duration": 8.0, "geometry": {"coordinates": []}, "legs": []}],
            "waypoints": [
                {"name": "", "location": [-74.0, 40.0], "waypoint_index": 1},
                {"name": "", "location": [-74.0, 40.001], "waypoint_index": 0},
                {"name": "", "location": [-74.001, 40.001], "waypoint_index": 2},
                {"name": "", "location": [-74.0, 40.002], "waypoint_index": 3}
            ]
        }"#;
        let native = parse_response(body, &request(true)).unwrap();
        assert_eq!(native.routes[0].waypoint_order, vec![1]);
    }

    #[test]
    fn test_error_code_is_reported() {
        let err = parse_response(
            r#"{"code":"NoRoute","message":"No route found"}"#,
            &request(false),
        )
        .unwrap_err();
        assert!(err.to_string().contains("NoRoute"));
    }
}
