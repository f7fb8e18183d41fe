pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use state::AppState;

use store::Query;

/// Build the application router with the configured auth gating.
pub fn app(state: AppState) -> Router {
    router(state, config::config().security.auth_required)
}

/// Router assembly with explicit auth gating, so tests can exercise both
/// modes without touching the process environment.
pub fn router(state: AppState, auth_required: bool) -> Router {
    use handlers::{auth, contracts, dashboard, documents, properties};

    let mut resources = Router::new()
        // Properties
        .route("/api/properties", get(properties::list).post(properties::create))
        .route(
            "/api/properties/:id",
            get(properties::get).put(properties::update).delete(properties::remove),
        )
        .route(
            "/api/properties/:id/images",
            get(properties::list_images).post(properties::upload_image),
        )
        .route("/api/properties/:id/images/:image_id", get(properties::image_redirect))
        // Contracts
        .route("/api/contracts", get(contracts::list).post(contracts::create))
        .route(
            "/api/contracts/:id",
            get(contracts::get).put(contracts::update).delete(contracts::remove),
        )
        .route("/api/contracts/property/:property_id", get(contracts::list_by_property))
        // Documents
        .route(
            "/api/documents/:entity_type/:entity_id",
            get(documents::list_by_entity).post(documents::upload),
        )
        .route(
            "/api/documents/:document_id",
            get(documents::get).delete(documents::remove),
        )
        // Dashboard
        .route("/api/dashboard/summary", get(dashboard::summary));

    if auth_required {
        resources = resources.layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));
    }

    // Token acquisition stays public regardless of gating
    let auth_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/logout", post(auth::logout));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(resources)
        .merge(auth_routes)
        // Global middleware
        .layer(DefaultBodyLimit::max(config::config().server.max_request_size_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "message": "Property Manager API",
        "version": version,
        "endpoints": {
            "properties": "/api/properties",
            "contracts": "/api/contracts",
            "documents": "/api/documents/:entityType/:entityId",
            "dashboard": "/api/dashboard/summary",
            "auth": "/api/auth/login, /api/auth/register, /api/auth/logout",
        }
    }))
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now().to_rfc3339();

    match state.store.select("properties", &Query::new().limit(1)).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok",
            })),
        ),
        Err(err) => {
            tracing::error!("health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "error": "data store unavailable",
                })),
            )
        }
    }
}
