use artwalk::config::Config;
use artwalk::constants::DEFAULT_MEMORY_DRAFT_MAX_SESSIONS;
use artwalk::db::{ArtworkRepository, PgArtworkRepository};
use artwalk::drafts::{DraftStore, MemoryDraftStore, RedisDraftStore};
use artwalk::services::directions::DirectionsProvider;
use artwalk::services::draft_service::DraftService;
use artwalk::services::geolocation::LocationTracker;
use artwalk::services::mapbox::{AuthMode, MapboxClient};
use artwalk::services::tour_generator::TourGenerator;
use artwalk::AppState;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artwalk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting ArtWalk API server");
    tracing::info!(
        viewing_minutes_per_stop = config.tour.viewing_minutes_per_stop,
        viewing_share_pct = config.tour.viewing_share_pct,
        arrival_threshold_m = config.tour.arrival_threshold_m,
        location_grace_secs = config.tour.location_grace_secs,
        "Configuration loaded successfully"
    );

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = artwalk::db::create_pool(&config.database_url).await?;
    tracing::info!("Database connection established");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;
    tracing::info!("Database migrations completed");

    // Draft storage: try Redis, fall back to in-memory
    let store: Arc<dyn DraftStore> = if let Some(ref redis_url) = config.redis_url {
        tracing::info!("Connecting to Redis draft store...");
        match RedisDraftStore::new(redis_url, config.draft_ttl).await {
            Ok(redis_store) => Arc::new(redis_store),
            Err(e) => {
                tracing::warn!(
                    "Failed to connect to Redis: {}. Falling back to in-memory draft store.",
                    e
                );
                Arc::new(MemoryDraftStore::new(
                    config.draft_ttl,
                    DEFAULT_MEMORY_DRAFT_MAX_SESSIONS,
                ))
            }
        }
    } else {
        tracing::info!("Redis URL not configured. Using in-memory draft store.");
        Arc::new(MemoryDraftStore::new(
            config.draft_ttl,
            DEFAULT_MEMORY_DRAFT_MAX_SESSIONS,
        ))
    };

    // Initialize services
    let repo: Arc<dyn ArtworkRepository> = Arc::new(PgArtworkRepository::new(db_pool));
    let mapbox_client = if let Some(ref base_url) = config.mapbox_base_url {
        MapboxClient::with_config(
            config.mapbox_api_key.clone(),
            base_url.clone(),
            AuthMode::BearerHeader,
        )
    } else {
        MapboxClient::new(config.mapbox_api_key.clone())
    };
    let directions: Arc<dyn DirectionsProvider> = Arc::new(mapbox_client);
    let tour_generator = TourGenerator::new(repo.clone(), directions, config.tour.clone());
    let drafts = DraftService::new(store, config.draft_ttl, config.tour.history_limit);
    let locations = LocationTracker::from_config(
        &config.tour,
        config.draft_ttl,
        DEFAULT_MEMORY_DRAFT_MAX_SESSIONS,
    );

    // Create application state
    let state = Arc::new(AppState {
        repo,
        tour_generator,
        drafts,
        locations,
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", artwalk::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
