// Site server binary entry point
//
// Purpose: Serve the Legacy companion site (pages + JSON lookup)
// Usage: cargo run --bin site_server

use legacy_site::{create_router, AppState, SiteConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "legacy_site=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting site server...");

    // Configuration from environment variables
    let config = SiteConfig::from_env();

    tracing::info!("Configuration:");
    tracing::info!("  DATA_DIR: {}", config.resolver.data_dir.display());
    tracing::info!("  SOURCE_MODE: {:?}", config.resolver.source_mode);
    tracing::info!("  LOOKUP_REGION_FILTER: {}", config.resolver.region_filter_on_lookup);
    tracing::info!("  LISTING_REGION_FILTER: {}", config.resolver.region_filter_on_listing);
    tracing::info!("  CACHE_DATASETS: {}", config.resolver.cache_datasets);
    tracing::info!("  SITE_URL: {}", config.site_url);

    for path in [config.resolver.base_path(), config.resolver.enriched_path()] {
        if !path.exists() {
            tracing::warn!("Data file {} does not exist yet; lookups will come back empty", path.display());
        }
    }

    let addr = config.socket_addr();
    let state = AppState::new(config);

    // Create router with all endpoints and middleware
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
