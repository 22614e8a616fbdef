use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use common::types::ApiResponse;
use models::milestone;
use serde::Deserialize;
use service::milestone_service::{self, CampaignMilestones, NewMilestone};

use super::campaigns::{required_param, IdQuery};
use crate::{errors::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResultBody {
    pub vote_result: i64,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

type MilestonePath = Result<Path<(String, String)>, PathRejection>;

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewMilestone>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<milestone::Model>>), ApiError> {
    let Json(input) = payload?;
    let created = milestone_service::create_milestone(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<CampaignMilestones>>, ApiError> {
    let Query(q) = query?;
    let id = required_param(q.id, "id")?;
    Ok(Json(ApiResponse::ok(milestone_service::milestones_of_campaign(&state.db, &id).await?)))
}

/// Add the submitted votes to the tally; only while the milestone is in voting.
pub async fn vote_result(
    State(state): State<AppState>,
    path: MilestonePath,
    payload: Result<Json<VoteResultBody>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let Path((object_id, milestone_id)) = path?;
    let Json(body) = payload?;
    let tally = milestone_service::update_vote_result(&state.db, &object_id, &milestone_id, body.vote_result).await?;
    Ok(Json(
        ApiResponse::done()
            .with(
                "message",
                format!("Vote result for campaign {object_id}, milestone {milestone_id} updated successfully."),
            )
            .with("new_vote_result", tally),
    ))
}

pub async fn claimed(
    State(state): State<AppState>,
    path: MilestonePath,
) -> Result<Json<ApiResponse<milestone::Model>>, ApiError> {
    let Path((object_id, milestone_id)) = path?;
    let claimed = milestone_service::claim(&state.db, &object_id, &milestone_id).await?;
    Ok(Json(ApiResponse::ok(claimed).with(
        "message",
        format!("is_claimed for campaign {object_id}, milestone {milestone_id} updated to true."),
    )))
}

pub async fn status(
    State(state): State<AppState>,
    path: MilestonePath,
    payload: Result<Json<StatusBody>, JsonRejection>,
) -> Result<Json<ApiResponse<milestone::Model>>, ApiError> {
    let Path((object_id, milestone_id)) = path?;
    let Json(body) = payload?;
    let moved = milestone_service::transition_status(&state.db, &object_id, &milestone_id, &body.status).await?;
    Ok(Json(ApiResponse::ok(moved)))
}
