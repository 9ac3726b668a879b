//! Stable application-wide constants.
//!
//! Values here are structural invariants and default fallbacks for
//! env-var-based configuration. The tunable tour knobs live in
//! [`TourConfig`](crate::config::TourConfig) and default to the values below.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Draft storage ---

/// Default draft/history expiry: 24 hours. Overridden by `DRAFT_TTL`.
pub const DEFAULT_DRAFT_TTL_SECONDS: u64 = 86_400;
/// Maximum sessions held by the in-memory draft store (LRU eviction).
pub const DEFAULT_MEMORY_DRAFT_MAX_SESSIONS: u64 = 10_000;
/// Default number of completed tours remembered per session.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

// --- Tour sizing ---

/// Tour durations (minutes) offered to the user.
pub const TOUR_LENGTH_OPTIONS: [u32; 4] = [30, 60, 90, 120];
/// Minutes spent looking at a single artwork.
pub const DEFAULT_VIEWING_MINUTES_PER_STOP: u32 = 3;
/// Share (percent) of the tour duration spent viewing; the rest is walking.
pub const DEFAULT_VIEWING_SHARE_PCT: u32 = 50;

// --- Directions ---

/// A directions step ending closer than this to a stop "arrives at" that stop.
pub const DEFAULT_ARRIVAL_THRESHOLD_METERS: f64 = 20.0;
/// Attempts per variation before it is marked unresolved.
pub const DEFAULT_DIRECTIONS_MAX_ATTEMPTS: usize = 3;
/// Base backoff between directions attempts (multiplied by the attempt number).
pub const DEFAULT_DIRECTIONS_RETRY_BACKOFF_MS: u64 = 250;
/// Mapbox Directions accepts at most 25 coordinates per request.
pub const MAPBOX_MAX_DIRECTIONS_COORDINATES: usize = 25;
/// Mapbox Optimization accepts at most 12 coordinates per request.
pub const MAPBOX_MAX_OPTIMIZED_COORDINATES: usize = 12;
/// Encoded polyline precision (decimal places) used for step geometry.
pub const POLYLINE_PRECISION: u32 = 5;

// --- Geolocation ---

/// Seconds a location failure is tolerated before the user is warned.
pub const DEFAULT_LOCATION_GRACE_SECONDS: u64 = 10;

/// Display name used when an artwork references an artist missing from the catalog.
pub const UNKNOWN_ARTIST_NAME: &str = "Unknown artist";
