// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod db;
pub mod drafts;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use db::ArtworkRepository;
use services::draft_service::DraftService;
use services::geolocation::LocationTracker;
use services::tour_generator::TourGenerator;
use std::sync::Arc;

// App state for sharing across the application
pub struct AppState {
    pub repo: Arc<dyn ArtworkRepository>,
    pub tour_generator: TourGenerator,
    pub drafts: DraftService,
    pub locations: LocationTracker,
}
