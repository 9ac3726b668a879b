pub mod directions;
pub mod draft_service;
pub mod geolocation;
pub mod mapbox;
pub mod tour_generator;
