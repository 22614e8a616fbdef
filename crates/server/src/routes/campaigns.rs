use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use common::types::ApiResponse;
use serde::Deserialize;
use service::campaign_service::{
    self, CampaignDetails, CampaignWithActivity, CreatedCampaign, CreatorCampaign, NewCampaign, VotingCampaign,
};
use service::pagination::Pagination;
use tracing::info;

use super::PageQuery;
use crate::{errors::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreatorQuery {
    pub creator: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// Pull a required, non-blank query value or fail with 400.
pub(crate) fn required_param(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("Missing {name} parameter")))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewCampaign>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedCampaign>>), ApiError> {
    let Json(input) = payload?;
    let created = campaign_service::create_campaign(&state.db, input).await?;
    info!(campaign_id = %created.campaign_id, "campaign_create_request");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<CampaignWithActivity>>>, ApiError> {
    let Query(q) = query?;
    let page = Pagination::from_query(q.limit, q.offset);
    let list = campaign_service::list_campaigns(&state.db, page).await?;
    Ok(Json(ApiResponse::ok(list).with("limit", page.limit).with("offset", page.offset)))
}

pub async fn by_creator(
    State(state): State<AppState>,
    query: Result<Query<CreatorQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<CreatorCampaign>>>, ApiError> {
    let Query(q) = query?;
    let creator = required_param(q.creator, "creator")?;
    let list = campaign_service::campaigns_by_creator(&state.db, &creator).await?;
    Ok(Json(ApiResponse::ok(list)))
}

pub async fn voting(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<VotingCampaign>>>, ApiError> {
    let Query(q) = query?;
    let page = Pagination::from_query(q.limit, q.offset);
    let list = campaign_service::voting_campaigns(&state.db, page).await?;
    Ok(Json(ApiResponse::ok(list).with("limit", page.limit).with("offset", page.offset)))
}

pub async fn details(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<CampaignDetails>>, ApiError> {
    let Query(q) = query?;
    let id = required_param(q.id, "id")?;
    Ok(Json(ApiResponse::ok(campaign_service::campaign_details(&state.db, &id).await?)))
}
