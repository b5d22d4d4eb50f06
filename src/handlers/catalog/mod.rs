// handlers/catalog/mod.rs - Catalog views under /catalog
//
// Each entity kind has list, detail and create handlers in its own module.
// The delete confirmation pair is shared and generic over the entity type.

use axum::extract::State;
use serde_json::Value;

use crate::api::state::AppState;
use crate::api::views::index_view;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::catalog_service;

pub mod creator;
pub mod delete;
pub mod genre;
pub mod show;

pub use delete::get as delete_get;
pub use delete::post as delete_post;

/// GET /catalog - record counts for the home page
pub async fn index(State(state): State<AppState>) -> ApiResult<Value> {
    let counts = catalog_service::counts(&*state.store).await?;
    Ok(ApiResponse::success(index_view(&counts)))
}
