use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Redirect,
    Json,
};
use serde_json::{json, Value};

use crate::api::format::entities_to_api_array;
use crate::api::state::AppState;
use crate::api::views::creator_detail_view;
use crate::database::models::Creator;
use crate::database::{Entity, Repository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::catalog_service::{self, CreatorForm};

/// GET /catalog/creators - all creators by last name
pub async fn list(State(state): State<AppState>) -> ApiResult<Value> {
    let creators = Repository::<Creator>::list(&*state.store).await?;
    Ok(ApiResponse::success(json!({
        "title": "Creator List",
        "creators": entities_to_api_array(&creators),
    })))
}

/// GET /catalog/creator/:id - creator with their shows
pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let detail = catalog_service::creator_detail(&*state.store, &id).await?;
    Ok(ApiResponse::success(creator_detail_view(&detail)))
}

/// POST /catalog/creator/create
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreatorForm>, JsonRejection>,
) -> Result<Redirect, ApiError> {
    let Json(form) = payload?;
    let creator = catalog_service::create_creator(&*state.store, &form).await?;
    Ok(Redirect::to(&creator.url()))
}
