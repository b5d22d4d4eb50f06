use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Redirect,
    Json,
};
use serde_json::{json, Value};

use crate::api::format::entities_to_api_array;
use crate::api::state::AppState;
use crate::api::views::genre_detail_view;
use crate::database::models::Genre;
use crate::database::{Entity, Repository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::catalog_service::{self, Created, GenreForm};

/// GET /catalog/genres - all genres by name
pub async fn list(State(state): State<AppState>) -> ApiResult<Value> {
    let genres = Repository::<Genre>::list(&*state.store).await?;
    Ok(ApiResponse::success(json!({
        "title": "Genre List",
        "genres": entities_to_api_array(&genres),
    })))
}

/// GET /catalog/genre/:id - genre with the shows listed under it
pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let detail = catalog_service::genre_detail(&*state.store, &id).await?;
    Ok(ApiResponse::success(genre_detail_view(&detail)))
}

/// POST /catalog/genre/create
///
/// Redirects to the genre, which may be an existing one with the same name.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<GenreForm>, JsonRejection>,
) -> Result<Redirect, ApiError> {
    let Json(form) = payload?;
    let genre = match catalog_service::create_genre(&*state.store, &form).await? {
        Created::New(genre) => genre,
        Created::Existing(genre) => {
            tracing::debug!(id = %genre.id, "Genre already exists, redirecting");
            genre
        }
    };
    Ok(Redirect::to(&genre.url()))
}
