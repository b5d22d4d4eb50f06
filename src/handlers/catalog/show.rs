use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Redirect,
    Json,
};
use serde_json::{json, Value};

use crate::api::format::entities_to_api_array;
use crate::api::state::AppState;
use crate::api::views::show_detail_view;
use crate::database::models::Show;
use crate::database::{Entity, Repository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::catalog_service::{self, ShowForm};

/// GET /catalog/shows - all shows by title
pub async fn list(State(state): State<AppState>) -> ApiResult<Value> {
    let shows = Repository::<Show>::list(&*state.store).await?;
    Ok(ApiResponse::success(json!({
        "title": "Show List",
        "shows": entities_to_api_array(&shows),
    })))
}

/// GET /catalog/show/:id - show with its creator and genres
pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let detail = catalog_service::show_detail(&*state.store, &id).await?;
    Ok(ApiResponse::success(show_detail_view(&detail)))
}

/// POST /catalog/show/create
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ShowForm>, JsonRejection>,
) -> Result<Redirect, ApiError> {
    let Json(form) = payload?;
    let show = catalog_service::create_show(&*state.store, &form).await?;
    Ok(Redirect::to(&show.url()))
}
