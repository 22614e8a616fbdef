use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::types::ApiResponse;
use models::contribution;
use serde::Deserialize;
use service::contribution_service::{self, ContributionReceipt, NewContribution};
use tracing::info;
use uuid::Uuid;

use super::campaigns::required_param;
use crate::{errors::ApiError, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ContributionQuery {
    pub address: Option<String>,
    pub campaign_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CampaignQuery {
    pub campaign_id: Option<String>,
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewContribution>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ContributionReceipt>>), ApiError> {
    let Json(input) = payload?;
    let receipt = contribution_service::create_contribution(&state.db, input).await?;
    info!(contribution_id = %receipt.contribution.id, "contribution_create_request");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(receipt))))
}

/// Wallet listing with campaign cards and the running total.
async fn wallet_listing(state: &AppState, address: &str) -> Result<Response, ApiError> {
    let wallet = contribution_service::contributions_by_wallet(&state.db, address).await?;
    Ok(Json(ApiResponse::ok(wallet.contributions).with("total_contributed", wallet.total_contributed)).into_response())
}

/// `?address=` lists a wallet, `?campaign_id=` a campaign, neither lists everything.
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ContributionQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(q) = query?;
    if let Some(address) = non_blank(q.address) {
        return wallet_listing(&state, &address).await;
    }
    let rows = match non_blank(q.campaign_id) {
        Some(campaign_id) => contribution_service::contributions_by_campaign(&state.db, &campaign_id).await?,
        None => contribution_service::all_contributions(&state.db).await?,
    };
    Ok(Json(ApiResponse::ok(rows)).into_response())
}

pub async fn by_wallet(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(address) = path?;
    wallet_listing(&state, &address).await
}

pub async fn by_campaign(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<Vec<contribution::Model>>>, ApiError> {
    let Path(id) = path?;
    Ok(Json(ApiResponse::ok(contribution_service::contributions_by_campaign(&state.db, &id).await?)))
}

pub async fn by_event(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ApiResponse<Vec<contribution::Model>>>, ApiError> {
    let Path(id) = path?;
    Ok(Json(ApiResponse::ok(contribution_service::contributions_by_event(&state.db, id).await?)))
}

pub async fn all_campaigns(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<contribution::Model>>>, ApiError> {
    Ok(Json(ApiResponse::ok(contribution_service::all_campaign_contributions(&state.db).await?)))
}

pub async fn all_events(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<contribution::Model>>>, ApiError> {
    Ok(Json(ApiResponse::ok(contribution_service::all_event_contributions(&state.db).await?)))
}

pub async fn addresses(
    State(state): State<AppState>,
    query: Result<Query<CampaignQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let Query(q) = query?;
    let campaign_id = required_param(q.campaign_id, "campaign_id")?;
    Ok(Json(ApiResponse::ok(contribution_service::addresses_by_campaign(&state.db, &campaign_id).await?)))
}
