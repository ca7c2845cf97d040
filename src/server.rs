// Axum server: router, shared state, JSON endpoints and HTTP error mapping
//
// HTML pages live in web::handlers::pages; this module wires them in next to
// the JSON API. Resolver calls do blocking file I/O, so they always run on the
// blocking thread pool.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};

use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::error::PlaqueError;
use crate::model::Plaque;
use crate::resolver::{ListOptions, PlaqueResolver};
use crate::web::handlers::pages;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<PlaqueResolver>,
    pub config: Arc<SiteConfig>,
}

impl AppState {
    pub fn new(config: SiteConfig) -> Self {
        tracing::info!(
            "Resolver: {:?} mode, data in {}",
            config.resolver.source_mode,
            config.resolver.data_dir.display()
        );
        if config.resolver.cache_datasets {
            tracing::info!("Dataset cache enabled (reload on mtime change)");
        }

        let resolver = Arc::new(PlaqueResolver::new(config.resolver.clone()));
        Self {
            resolver,
            config: Arc::new(config),
        }
    }
}

/// Run a resolver call on the blocking pool
pub(crate) async fn with_resolver<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&PlaqueResolver) -> T + Send + 'static,
    T: Send + 'static,
{
    let resolver = Arc::clone(&state.resolver);
    tokio::task::spawn_blocking(move || f(&resolver))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // JSON API
        .route("/api/plaques", get(list_plaques))
        .route("/api/plaque/:id", get(get_plaque))

        // HTML pages
        .route("/", get(pages::home_page))
        .route("/plaques", get(pages::plaques_page))
        .route("/plaque/:id", get(pages::plaque_page))
        .route("/privacy", get(pages::privacy_page))
        .route("/support", get(pages::support_page))
        .fallback(pages::not_found_page)

        // Middleware (outermost first)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http()) // Request logging
                .layer(CorsLayer::permissive()) // Public, read-only data
                .layer(CompressionLayer::new()), // gzip + brotli
        )
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// GET /api/plaque/:id
async fn get_plaque(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Plaque>, AppError> {
    tracing::debug!("Fetching plaque {}", id);

    let plaque = with_resolver(&state, move |resolver| resolver.get(&id)).await??;
    Ok(Json(plaque))
}

#[derive(serde::Deserialize, Debug)]
struct ListQuery {
    limit: Option<usize>,
    region: Option<bool>,
}

/// GET /api/plaques?limit=&region=
async fn list_plaques(
    State(state): State<AppState>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Query(params) = params?;
    let options = ListOptions {
        limit: params.limit,
        region_filter: params.region,
    };

    let plaques = with_resolver(&state, move |resolver| resolver.try_list_all(options)).await??;

    Ok(Json(serde_json::json!({
        "rows": plaques.len(),
        "data": plaques,
    })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    /// Detail is logged, never sent to the client
    Internal(String),
}

impl From<PlaqueError> for AppError {
    fn from(err: PlaqueError) -> Self {
        if err.is_not_found() {
            AppError::NotFound("Plaque not found".to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
