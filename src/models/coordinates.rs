use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        Ok(Coordinates { lat, lng })
    }

    /// Range check for values that arrived without going through `new`
    pub fn validate(&self) -> Result<(), String> {
        Coordinates::new(self.lat, self.lng).map(|_| ())
    }

    /// Build from a GeoJSON `[lng, lat]` pair
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Coordinates {
            lat: pair[1],
            lng: pair[0],
        }
    }

    /// Calculate distance between two coordinates using Haversine formula
    /// Returns distance in kilometers
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        // Rounding can push `a` just past 1.0 for antipodal points
        let a = a.clamp(0.0, 1.0);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    /// Haversine distance in meters
    pub fn distance_meters_to(&self, other: &Coordinates) -> f64 {
        self.distance_to(other) * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(48.8566, 2.3522).is_ok());
        assert!(Coordinates::new(91.0, 0.0).is_err()); // Invalid lat
        assert!(Coordinates::new(0.0, 181.0).is_err()); // Invalid lng
    }

    #[test]
    fn test_distance_calculation() {
        let paris = Coordinates::new(48.8566, 2.3522).unwrap();
        let london = Coordinates::new(51.5074, -0.1278).unwrap();

        let distance = paris.distance_to(&london);
        // Paris to London is approximately 344 km
        assert!((distance - 344.0).abs() < 10.0);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let points = [
            Coordinates::new(0.0, 0.0).unwrap(),
            Coordinates::new(-33.8688, 151.2093).unwrap(),
            Coordinates::new(90.0, 180.0).unwrap(),
            Coordinates::new(-90.0, -180.0).unwrap(),
        ];
        for p in points {
            assert_eq!(p.distance_to(&p), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let berlin = Coordinates::new(52.52, 13.405).unwrap();
        let lisbon = Coordinates::new(38.7223, -9.1393).unwrap();
        assert_eq!(berlin.distance_to(&lisbon), lisbon.distance_to(&berlin));
    }

    #[test]
    fn test_antipodal_distance_is_half_circumference() {
        let a = Coordinates::new(10.0, 20.0).unwrap();
        let b = Coordinates::new(-10.0, -160.0).unwrap();
        let d = a.distance_to(&b);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 0.01);
    }

    #[test]
    fn test_distance_meters() {
        let a = Coordinates::new(48.8566, 2.3522).unwrap();
        let b = Coordinates::new(48.8567, 2.3522).unwrap();
        // 0.0001 deg of latitude is roughly 11 m
        let m = a.distance_meters_to(&b);
        assert!((m - 11.1).abs() < 0.5, "got {m}");
    }

    #[test]
    fn test_from_lng_lat() {
        let c = Coordinates::from_lng_lat([2.3522, 48.8566]);
        assert_eq!(c.lat, 48.8566);
        assert_eq!(c.lng, 2.3522);
    }
}
