use super::{
    LatLngSource, NativeBounds, NativeDirections, NativeLeg, NativeRoute, NativeStep,
    NativeWaypoint,
};
use crate::models::{
    Coordinates, DirectionsValidationError, GeocodedWaypoint, PlainBounds, PlainDirections,
    PlainLeg, PlainRoute, PlainStep,
};

fn plain_path(path: &[LatLngSource]) -> Vec<Coordinates> {
    path.iter().map(LatLngSource::normalize).collect()
}

fn native_path(path: &[Coordinates]) -> Vec<LatLngSource> {
    path.iter().copied().map(LatLngSource::accessor).collect()
}

/// Normalize a provider response into plain data and validate it.
/// The request echo is dropped.
pub fn to_plain(native: &NativeDirections) -> Result<PlainDirections, DirectionsValidationError> {
    let routes = native
        .routes
        .iter()
        .map(|route| PlainRoute {
            bounds: PlainBounds {
                northeast: route.bounds.northeast.normalize(),
                southwest: route.bounds.southwest.normalize(),
            },
            legs: route
                .legs
                .iter()
                .map(|leg| PlainLeg {
                    start_location: leg.start_location.normalize(),
                    end_location: leg.end_location.normalize(),
                    distance_meters: leg.distance_meters,
                    duration_seconds: leg.duration_seconds,
                    steps: leg
                        .steps
                        .iter()
                        .map(|step| PlainStep {
                            start_location: step.start_location.normalize(),
                            end_location: step.end_location.normalize(),
                            instructions: step.instructions.clone(),
                            distance_meters: step.distance_meters,
                            duration_seconds: step.duration_seconds,
                            polyline: step.polyline.clone(),
                            path: plain_path(&step.path),
                            travel_mode: step.travel_mode.clone(),
                            maneuver: step.maneuver.clone(),
                        })
                        .collect(),
                })
                .collect(),
            overview_polyline: route.overview_polyline.clone(),
            overview_path: plain_path(&route.overview_path),
            summary: route.summary.clone(),
            warnings: route.warnings.clone(),
            waypoint_order: route.waypoint_order.clone(),
        })
        .collect();

    let geocoded_waypoints = native
        .geocoded_waypoints
        .iter()
        .map(|waypoint| GeocodedWaypoint {
            name: waypoint.name.clone(),
            location: waypoint.location.normalize(),
        })
        .collect();

    let plain = PlainDirections {
        routes,
        geocoded_waypoints,
    };
    plain.validate()?;
    Ok(plain)
}

/// Rebuild provider-native objects for the map widget
pub fn to_native(plain: &PlainDirections) -> NativeDirections {
    let routes = plain
        .routes
        .iter()
        .map(|route| NativeRoute {
            bounds: NativeBounds {
                northeast: LatLngSource::accessor(route.bounds.northeast),
                southwest: LatLngSource::accessor(route.bounds.southwest),
            },
            legs: route
                .legs
                .iter()
                .map(|leg| NativeLeg {
                    start_location: LatLngSource::accessor(leg.start_location),
                    end_location: LatLngSource::accessor(leg.end_location),
                    distance_meters: leg.distance_meters,
                    duration_seconds: leg.duration_seconds,
                    steps: leg
                        .steps
                        .iter()
                        .map(|step| NativeStep {
                            start_location: LatLngSource::accessor(step.start_location),
                            end_location: LatLngSource::accessor(step.end_location),
                            instructions: step.instructions.clone(),
                            distance_meters: step.distance_meters,
                            duration_seconds: step.duration_seconds,
                            polyline: step.polyline.clone(),
                            path: native_path(&step.path),
                            travel_mode: step.travel_mode.clone(),
                            maneuver: step.maneuver.clone(),
                        })
                        .collect(),
                })
                .collect(),
            overview_polyline: route.overview_polyline.clone(),
            overview_path: native_path(&route.overview_path),
            summary: route.summary.clone(),
            warnings: route.warnings.clone(),
            waypoint_order: route.waypoint_order.clone(),
        })
        .collect();

    let geocoded_waypoints = plain
        .geocoded_waypoints
        .iter()
        .map(|waypoint| NativeWaypoint {
            name: waypoint.name.clone(),
            location: LatLngSource::accessor(waypoint.location),
        })
        .collect();

    NativeDirections {
        routes,
        geocoded_waypoints,
        request: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::directions::DirectionsRequest;

    fn c(lat: f64, lng: f64) -> Coordinates {
        Coordinates { lat, lng }
    }

    fn native_with(northeast: LatLngSource) -> NativeDirections {
        let step = NativeStep {
            start_location: LatLngSource::value(c(52.50, 13.41)),
            end_location: LatLngSource::accessor(c(52.501, 13.412)),
            instructions: "Turn left onto Skalitzer Straße".to_string(),
            distance_meters: 180.0,
            duration_seconds: 130.0,
            polyline: "}~k_I_qrqA".to_string(),
            path: vec![
                LatLngSource::value(c(52.50, 13.41)),
                LatLngSource::accessor(c(52.501, 13.412)),
            ],
            travel_mode: "WALKING".to_string(),
            maneuver: Some("turn".to_string()),
        };
        NativeDirections {
            routes: vec![NativeRoute {
                bounds: NativeBounds {
                    northeast,
                    southwest: LatLngSource::value(c(52.50, 13.41)),
                },
                legs: vec![NativeLeg {
                    start_location: LatLngSource::value(c(52.50, 13.41)),
                    end_location: LatLngSource::accessor(c(52.501, 13.412)),
                    distance_meters: 180.0,
                    duration_seconds: 130.0,
                    steps: vec![step],
                }],
                overview_polyline: "}~k_I_qrqA".to_string(),
                overview_path: vec![LatLngSource::value(c(52.50, 13.41))],
                summary: "Skalitzer Straße".to_string(),
                warnings: vec![],
                waypoint_order: vec![],
            }],
            geocoded_waypoints: vec![NativeWaypoint {
                name: "Skalitzer Straße".to_string(),
                location: LatLngSource::value(c(52.50, 13.41)),
            }],
            request: Some(DirectionsRequest {
                origin: c(52.50, 13.41),
                destination: c(52.501, 13.412),
                waypoints: vec![],
                optimize_waypoints: false,
            }),
        }
    }

    #[test]
    fn test_to_plain_normalizes_mixed_sources() {
        let plain = to_plain(&native_with(LatLngSource::accessor(c(52.501, 13.412)))).unwrap();
        let step = &plain.routes[0].legs[0].steps[0];
        assert_eq!(step.start_location, c(52.50, 13.41));
        assert_eq!(step.end_location, c(52.501, 13.412));
        assert_eq!(step.path.len(), 2);
        assert_eq!(plain.routes[0].bounds.northeast, c(52.501, 13.412));
    }

    #[test]
    fn test_to_plain_drops_request() {
        let plain = to_plain(&native_with(LatLngSource::value(c(52.501, 13.412)))).unwrap();
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("request").is_none());
    }

    #[test]
    fn test_to_plain_rejects_invalid_accessor_output() {
        let bad = LatLngSource::Accessor {
            lat: std::sync::Arc::new(|| f64::NAN),
            lng: std::sync::Arc::new(|| 13.4),
        };
        let err = to_plain(&native_with(bad)).unwrap_err();
        assert_eq!(err.path(), "routes[0].bounds.northeast");
    }

    #[test]
    fn test_round_trip_is_stable() {
        let plain = to_plain(&native_with(LatLngSource::accessor(c(52.501, 13.412)))).unwrap();
        let again = to_plain(&to_native(&plain)).unwrap();
        assert_eq!(
            serde_json::to_vec(&again).unwrap(),
            serde_json::to_vec(&plain).unwrap()
        );
    }

    #[test]
    fn test_to_native_uses_accessors() {
        let plain = to_plain(&native_with(LatLngSource::value(c(52.501, 13.412)))).unwrap();
        let native = to_native(&plain);
        assert!(native.request.is_none());
        assert!(matches!(
            native.routes[0].legs[0].steps[0].end_location,
            LatLngSource::Accessor { .. }
        ));
    }
}
