use axum::{extract::{rejection::JsonRejection, State}, http::StatusCode, Json};
use common::types::ApiResponse;
use models::campaign_image;
use service::image_service::{self, NewImage};

use crate::{errors::ApiError, state::AppState};

pub async fn upload(
    State(state): State<AppState>,
    payload: Result<Json<NewImage>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<campaign_image::Model>>), ApiError> {
    let Json(input) = payload?;
    let created = image_service::upload_image(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}
