use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use common::types::ApiResponse;
use service::campaign_service::{self, CreatorCampaign};
use service::contribution_service::{self, ContributionWithCampaign};
use service::profile::domain::{NewProfile, Profile, ProfilePatch, ProfileStats};
use tracing::info;

use super::{campaigns::required_param, AddressQuery};
use crate::{errors::ApiError, state::AppState};

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewProfile>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Profile>>), ApiError> {
    let Json(input) = payload?;
    let profile = state.profiles.create(input).await?;
    info!(profile_id = %profile.id, "profile_create_request");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(profile))))
}

pub async fn by_wallet(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.profiles.by_wallet(&address).await?)))
}

pub async fn by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.profiles.by_email(&email).await?)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(address): Path<String>,
    payload: Result<Json<ProfilePatch>, JsonRejection>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    let Json(patch) = payload?;
    Ok(Json(ApiResponse::ok(state.profiles.update(&address, patch).await?)))
}

pub async fn me(
    State(state): State<AppState>,
    query: Result<Query<AddressQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ProfileStats>>, ApiError> {
    let Query(q) = query?;
    let address = required_param(q.address, "address")?;
    Ok(Json(ApiResponse::ok(state.profiles.my_profile(&address).await?)))
}

pub async fn my_campaigns(
    State(state): State<AppState>,
    query: Result<Query<AddressQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<CreatorCampaign>>>, ApiError> {
    let Query(q) = query?;
    let address = required_param(q.address, "address")?;
    Ok(Json(ApiResponse::ok(campaign_service::campaigns_by_creator(&state.db, &address).await?)))
}

pub async fn my_contributions(
    State(state): State<AppState>,
    query: Result<Query<AddressQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<ContributionWithCampaign>>>, ApiError> {
    let Query(q) = query?;
    let address = required_param(q.address, "address")?;
    let wallet = contribution_service::contributions_by_wallet(&state.db, &address).await?;
    Ok(Json(ApiResponse::ok(wallet.contributions)))
}
