use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use common::types::ApiResponse;
use service::event_service::{self, CreatedEvent, EventDetails, EventWithImages, NewEvent};
use service::pagination::Pagination;
use tracing::info;
use uuid::Uuid;

use super::PageQuery;
use crate::{errors::ApiError, state::AppState};

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedEvent>>), ApiError> {
    let Json(input) = payload?;
    let created = event_service::create_event(&state.db, input).await?;
    info!(event_id = %created.event_id, "event_create_request");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<EventWithImages>>>, ApiError> {
    let Query(q) = query?;
    let page = Pagination::from_query(q.limit, q.offset);
    let events = event_service::list_events(&state.db, page).await?;
    Ok(Json(ApiResponse::ok(events).with("limit", page.limit).with("offset", page.offset)))
}

pub async fn details(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<EventDetails>>, ApiError> {
    let Path(id) = path?;
    Ok(Json(ApiResponse::ok(event_service::event_details(&state.db, id).await?)))
}
