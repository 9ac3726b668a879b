use crate::config::TourConfig;
use crate::models::Coordinates;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Why a position fix could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationError {
    PermissionDenied,
    Timeout,
    Unavailable,
}

impl LocationError {
    pub fn message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => {
                "Location access was denied. Enable location permissions to follow the tour on the map."
            }
            LocationError::Timeout => {
                "Finding your location is taking longer than expected. Move to an open area and try again."
            }
            LocationError::Unavailable => {
                "Your location is currently unavailable. Directions will start from the first stop."
            }
        }
    }
}

/// A warning ready to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationWarning {
    pub error: LocationError,
    pub message: &'static str,
}

/// Tracks the live position watch and decides when a failure is worth
/// telling the user about. Failures are held back for a grace period so a
/// slow permission prompt does not flash a warning.
#[derive(Debug, Clone)]
pub struct LocationMonitor {
    grace: Duration,
    position: Option<Coordinates>,
    /// Latest error and when the current run of errors started
    failing: Option<(LocationError, Instant)>,
}

impl LocationMonitor {
    pub fn new(grace: Duration) -> Self {
        LocationMonitor {
            grace,
            position: None,
            failing: None,
        }
    }

    /// A fix clears any pending error
    pub fn record_fix(&mut self, position: Coordinates) {
        self.position = Some(position);
        self.failing = None;
    }

    pub fn record_error(&mut self, error: LocationError, at: Instant) {
        let since = match self.failing {
            Some((_, since)) => since,
            None => at,
        };
        tracing::debug!(error = ?error, "Geolocation error");
        self.failing = Some((error, since));
    }

    pub fn position(&self) -> Option<Coordinates> {
        self.position
    }

    /// The warning to show at `now`, if the grace period has run out
    pub fn warning(&self, now: Instant) -> Option<LocationWarning> {
        let (error, since) = self.failing?;
        if now.saturating_duration_since(since) < self.grace {
            return None;
        }
        Some(LocationWarning {
            error,
            message: error.message(),
        })
    }
}

/// One event from the client's position watch.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationReport {
    Fix { position: Coordinates },
    Error { error: LocationError },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationStatus {
    pub position: Option<Coordinates>,
    pub warning: Option<LocationWarning>,
}

/// A [`LocationMonitor`] per session, all sharing the configured grace period.
#[derive(Clone)]
pub struct LocationTracker {
    grace: Duration,
    monitors: Cache<Uuid, LocationMonitor>,
}

impl LocationTracker {
    pub fn new(grace: Duration, ttl_seconds: u64, max_sessions: u64) -> Self {
        LocationTracker {
            grace,
            monitors: Cache::builder()
                .time_to_live(Duration::from_secs(ttl_seconds))
                .max_capacity(max_sessions)
                .build(),
        }
    }

    pub fn from_config(config: &TourConfig, ttl_seconds: u64, max_sessions: u64) -> Self {
        Self::new(config.location_grace(), ttl_seconds, max_sessions)
    }

    pub async fn report(&self, session: Uuid, report: LocationReport) -> LocationStatus {
        self.report_at(session, report, Instant::now()).await
    }

    pub async fn report_at(
        &self,
        session: Uuid,
        report: LocationReport,
        now: Instant,
    ) -> LocationStatus {
        let mut monitor = self
            .monitors
            .get(&session)
            .await
            .unwrap_or_else(|| LocationMonitor::new(self.grace));

        match report {
            LocationReport::Fix { position } => monitor.record_fix(position),
            LocationReport::Error { error } => monitor.record_error(error, now),
        }

        let status = LocationStatus {
            position: monitor.position(),
            warning: monitor.warning(now),
        };
        self.monitors.insert(session, monitor).await;
        status
    }

    pub async fn status(&self, session: Uuid) -> LocationStatus {
        self.status_at(session, Instant::now()).await
    }

    pub async fn status_at(&self, session: Uuid, now: Instant) -> LocationStatus {
        match self.monitors.get(&session).await {
            Some(monitor) => LocationStatus {
                position: monitor.position(),
                warning: monitor.warning(now),
            },
            None => LocationStatus {
                position: None,
                warning: None,
            },
        }
    }

    /// Last known position, used as the walking start when none is given
    pub async fn last_position(&self, session: Uuid) -> Option<Coordinates> {
        self.monitors.get(&session).await?.position()
    }
}
