use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use common::types::ApiResponse;
use models::tier;
use serde::Deserialize;
use service::tier_service::{self, NewTier};

use super::campaigns::required_param;
use crate::{errors::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct TierQuery {
    pub campaign_id: Option<String>,
}

pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<NewTier>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<tier::Model>>), ApiError> {
    let Json(input) = payload?;
    let created = tier_service::add_tier(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<TierQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<tier::Model>>>, ApiError> {
    let Query(q) = query?;
    let campaign_id = required_param(q.campaign_id, "campaign_id")?;
    Ok(Json(ApiResponse::ok(tier_service::list_tiers(&state.db, &campaign_id).await?)))
}
