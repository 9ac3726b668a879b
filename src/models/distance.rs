use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance in kilometers
/// Prevents mixing up units and provides type safety
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DistanceKm(pub f64);

impl DistanceKm {
    pub fn as_km(self) -> f64 {
        self.0
    }
}

impl fmt::Display for DistanceKm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}km", self.0)
    }
}

/// Distance in meters
/// Used for arrival thresholds and provider route lengths
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct DistanceMeters(pub f64);

impl DistanceMeters {
    pub fn to_km(self) -> DistanceKm {
        DistanceKm(self.0 / 1000.0)
    }

    pub fn as_meters(self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_conversion() {
        assert_eq!(DistanceMeters(1250.0).to_km().as_km(), 1.25);
        assert_eq!(DistanceMeters(19.96).as_meters(), 19.96);
    }

    #[test]
    fn test_distance_km_display() {
        assert_eq!(format!("{}", DistanceMeters(2049.0).to_km()), "2.05km");
    }

    #[test]
    fn test_distance_km_serializes_as_number() {
        let json = serde_json::to_value(DistanceKm(1.5)).unwrap();
        assert_eq!(json, serde_json::json!(1.5));
    }
}
