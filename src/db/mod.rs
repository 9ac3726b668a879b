use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub mod artwork_repository;
mod catalog_queries;
pub mod memory_repo;

pub use artwork_repository::{ArtworkRepository, PgArtworkRepository};
pub use memory_repo::InMemoryArtworkRepository;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}
