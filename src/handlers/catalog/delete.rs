use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::api::format::ApiFormat;
use crate::api::state::AppState;
use crate::api::views::DeleteView;
use crate::database::{CatalogStore, Deletable, Repository};
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::services::delete_service::{confirm_delete, prepare_delete, DeleteOutcome, PrepareOutcome};

/// GET /catalog/:kind/:id/delete - confirmation view with current dependents
///
/// A missing entity redirects to the listing instead of failing.
pub async fn get<E>(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, ApiError>
where
    E: Deletable + ApiFormat,
    dyn CatalogStore: Repository<E>,
{
    match prepare_delete::<E, dyn CatalogStore>(&*state.store, &id).await? {
        PrepareOutcome::Ready(confirmation) => {
            Ok(ApiResponse::success(DeleteView::from_confirmation(&confirmation)).into_response())
        }
        PrepareOutcome::NotFound => Ok(Redirect::to(&E::KIND.list_url()).into_response()),
    }
}

/// POST /catalog/:kind/:id/delete - remove the entity unless something still
/// refers to it
///
/// Blocked deletes answer 409 with the same view the GET renders.
pub async fn post<E>(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, ApiError>
where
    E: Deletable + ApiFormat,
    dyn CatalogStore: Repository<E>,
{
    match confirm_delete::<E, dyn CatalogStore>(&*state.store, &id).await? {
        DeleteOutcome::Removed | DeleteOutcome::NotFound => Ok(Redirect::to(&E::KIND.list_url()).into_response()),
        DeleteOutcome::Blocked(confirmation) => {
            let view = DeleteView::from_confirmation(&confirmation);
            let message = format!(
                "{} is still referenced by {} show(s)",
                E::KIND.label(),
                view.dependent_count
            );
            Ok(ApiResponse::rejected(view, StatusCode::CONFLICT, message).into_response())
        }
    }
}
