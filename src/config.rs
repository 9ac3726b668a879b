use crate::constants::*;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub redis_url: Option<String>,
    pub mapbox_api_key: String,
    /// Proxy URL; when set the client authenticates with a bearer header
    pub mapbox_base_url: Option<String>,
    pub draft_ttl: u64,
    pub tour: TourConfig,
}

#[derive(Debug, Clone)]
pub struct TourConfig {
    /// Minutes spent at each stop
    pub viewing_minutes_per_stop: u32,

    /// Percentage of the tour spent viewing rather than walking (1-100)
    pub viewing_share_pct: u32,

    /// Distance (m) under which a directions step is attributed to a stop
    pub arrival_threshold_m: f64,

    /// Directions attempts per variation before giving up
    pub directions_max_attempts: usize,

    /// Base backoff between directions attempts, multiplied by attempt number
    pub directions_retry_backoff_ms: u64,

    /// Ask the provider to reorder intermediate waypoints
    pub optimize_waypoints: bool,

    /// Number of completed tours kept per session
    pub history_limit: usize,

    /// Seconds a geolocation failure is tolerated before warning
    pub location_grace_secs: u64,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            viewing_minutes_per_stop: DEFAULT_VIEWING_MINUTES_PER_STOP,
            viewing_share_pct: DEFAULT_VIEWING_SHARE_PCT,
            arrival_threshold_m: DEFAULT_ARRIVAL_THRESHOLD_METERS,
            directions_max_attempts: DEFAULT_DIRECTIONS_MAX_ATTEMPTS,
            directions_retry_backoff_ms: DEFAULT_DIRECTIONS_RETRY_BACKOFF_MS,
            optimize_waypoints: false,
            history_limit: DEFAULT_HISTORY_LIMIT,
            location_grace_secs: DEFAULT_LOCATION_GRACE_SECONDS,
        }
    }
}

impl TourConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            viewing_minutes_per_stop: env::var("TOUR_VIEWING_MINUTES_PER_STOP")
                .unwrap_or_else(|_| defaults.viewing_minutes_per_stop.to_string())
                .parse()
                .map_err(|_| "Invalid TOUR_VIEWING_MINUTES_PER_STOP")?,

            viewing_share_pct: env::var("TOUR_VIEWING_SHARE_PCT")
                .unwrap_or_else(|_| defaults.viewing_share_pct.to_string())
                .parse()
                .map_err(|_| "Invalid TOUR_VIEWING_SHARE_PCT")?,

            arrival_threshold_m: env::var("TOUR_ARRIVAL_THRESHOLD_M")
                .unwrap_or_else(|_| defaults.arrival_threshold_m.to_string())
                .parse()
                .map_err(|_| "Invalid TOUR_ARRIVAL_THRESHOLD_M")?,

            directions_max_attempts: env::var("TOUR_DIRECTIONS_MAX_ATTEMPTS")
                .unwrap_or_else(|_| defaults.directions_max_attempts.to_string())
                .parse()
                .map_err(|_| "Invalid TOUR_DIRECTIONS_MAX_ATTEMPTS")?,

            directions_retry_backoff_ms: env::var("TOUR_DIRECTIONS_RETRY_BACKOFF_MS")
                .unwrap_or_else(|_| defaults.directions_retry_backoff_ms.to_string())
                .parse()
                .map_err(|_| "Invalid TOUR_DIRECTIONS_RETRY_BACKOFF_MS")?,

            optimize_waypoints: env::var("TOUR_OPTIMIZE_WAYPOINTS")
                .unwrap_or_else(|_| defaults.optimize_waypoints.to_string())
                .parse()
                .map_err(|_| "Invalid TOUR_OPTIMIZE_WAYPOINTS")?,

            history_limit: env::var("TOUR_HISTORY_LIMIT")
                .unwrap_or_else(|_| defaults.history_limit.to_string())
                .parse()
                .map_err(|_| "Invalid TOUR_HISTORY_LIMIT")?,

            location_grace_secs: env::var("TOUR_LOCATION_GRACE_SECS")
                .unwrap_or_else(|_| defaults.location_grace_secs.to_string())
                .parse()
                .map_err(|_| "Invalid TOUR_LOCATION_GRACE_SECS")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.viewing_minutes_per_stop == 0 {
            return Err("TOUR_VIEWING_MINUTES_PER_STOP must be at least 1".to_string());
        }
        if !(1..=100).contains(&self.viewing_share_pct) {
            return Err("TOUR_VIEWING_SHARE_PCT must be between 1 and 100".to_string());
        }
        if !(self.arrival_threshold_m.is_finite() && self.arrival_threshold_m > 0.0) {
            return Err("TOUR_ARRIVAL_THRESHOLD_M must be a positive number".to_string());
        }
        if self.directions_max_attempts == 0 {
            return Err("TOUR_DIRECTIONS_MAX_ATTEMPTS must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn location_grace(&self) -> Duration {
        Duration::from_secs(self.location_grace_secs)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            database_url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            redis_url: env::var("REDIS_URL").ok(),
            mapbox_api_key: env::var("MAPBOX_API_KEY").map_err(|_| "MAPBOX_API_KEY must be set")?,
            mapbox_base_url: env::var("MAPBOX_BASE_URL").ok().filter(|s| !s.is_empty()),
            draft_ttl: env::var("DRAFT_TTL")
                .unwrap_or_else(|_| DEFAULT_DRAFT_TTL_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid DRAFT_TTL")?,
            tour: TourConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const TOUR_VARS: [&str; 8] = [
        "TOUR_VIEWING_MINUTES_PER_STOP",
        "TOUR_VIEWING_SHARE_PCT",
        "TOUR_ARRIVAL_THRESHOLD_M",
        "TOUR_DIRECTIONS_MAX_ATTEMPTS",
        "TOUR_DIRECTIONS_RETRY_BACKOFF_MS",
        "TOUR_OPTIMIZE_WAYPOINTS",
        "TOUR_HISTORY_LIMIT",
        "TOUR_LOCATION_GRACE_SECS",
    ];

    fn clear_tour_vars() {
        for var in TOUR_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_tour_config_defaults_from_env() {
        clear_tour_vars();
        let config = TourConfig::from_env().unwrap();
        assert_eq!(config.viewing_minutes_per_stop, 3);
        assert_eq!(config.viewing_share_pct, 50);
        assert_eq!(config.arrival_threshold_m, 20.0);
        assert_eq!(config.directions_max_attempts, 3);
        assert!(!config.optimize_waypoints);
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.location_grace(), Duration::from_secs(10));
    }

    #[test]
    #[serial]
    fn test_tour_config_overrides() {
        clear_tour_vars();
        env::set_var("TOUR_ARRIVAL_THRESHOLD_M", "35.5");
        env::set_var("TOUR_OPTIMIZE_WAYPOINTS", "true");
        let config = TourConfig::from_env().unwrap();
        clear_tour_vars();

        assert_eq!(config.arrival_threshold_m, 35.5);
        assert!(config.optimize_waypoints);
    }

    #[test]
    #[serial]
    fn test_tour_config_rejects_bad_values() {
        clear_tour_vars();
        env::set_var("TOUR_VIEWING_MINUTES_PER_STOP", "abc");
        let err = TourConfig::from_env().unwrap_err();
        assert!(err.contains("TOUR_VIEWING_MINUTES_PER_STOP"));

        env::set_var("TOUR_VIEWING_MINUTES_PER_STOP", "0");
        assert!(TourConfig::from_env().is_err());

        clear_tour_vars();
        env::set_var("TOUR_VIEWING_SHARE_PCT", "150");
        assert!(TourConfig::from_env().is_err());
        clear_tour_vars();
    }

    #[test]
    fn test_validate_threshold() {
        let config = TourConfig {
            arrival_threshold_m: -1.0,
            ..TourConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
