// handlers/public/mod.rs - Service info and liveness
//
// Route Prefix: none (/, /health)

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::api::state::AppState;

/// GET / - service description and route overview
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Show Catalog",
            "version": version,
            "environment": state.config.environment,
            "description": "Catalog of shows, creators and genres",
            "endpoints": {
                "home": "/catalog",
                "shows": "/catalog/shows, /catalog/show/:id[/delete], /catalog/show/create",
                "creators": "/catalog/creators, /catalog/creator/:id[/delete], /catalog/creator/create",
                "genres": "/catalog/genres, /catalog/genre/:id[/delete], /catalog/genre/create",
                "health": "/health",
            }
        }
    }))
}

/// GET /health - 200 when the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.store.backend();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": backend
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": backend
                    }
                })),
            )
        }
    }
}
