//! Event-service catalog endpoints. Updates and deletes are POSTs.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use common::types::ApiResponse;
use models::service_item;
use service::catalog::{self, NewServiceItem, ServiceItemPatch};

use crate::{errors::ApiError, state::AppState};

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewServiceItem>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<service_item::Model>>), ApiError> {
    let Json(input) = payload?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(catalog::create_service(&state.db, input).await?))))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<service_item::Model>>>, ApiError> {
    Ok(Json(ApiResponse::ok(catalog::list_services(&state.db).await?)))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<service_item::Model>>, ApiError> {
    Ok(Json(ApiResponse::ok(catalog::get_service(&state.db, &id).await?)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ServiceItemPatch>, JsonRejection>,
) -> Result<Json<ApiResponse<service_item::Model>>, ApiError> {
    let Json(patch) = payload?;
    Ok(Json(ApiResponse::ok(catalog::update_service(&state.db, &id, patch).await?)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    catalog::delete_service(&state.db, &id).await?;
    Ok(Json(ApiResponse::done().with("message", format!("service {id} deleted"))))
}
