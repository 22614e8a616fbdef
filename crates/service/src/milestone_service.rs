//! Campaign milestones and their voting gate.
//!
//! Every status-dependent write is one conditional `UPDATE ... WHERE status = ?`.
//! When no row is affected the milestone was not in the required state (or a
//! concurrent request moved it first) and the call fails with `Conflict`.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::campaign;
use models::milestone::{self, MilestoneStatus};
use models::validate;

use crate::errors::ServiceError;

/// `POST /upload-milestone` body. The campaign is named by `campaignId`
/// (UUID) or `objectId` (on-chain object id).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMilestone {
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub object_id: Option<String>,
    /// On-chain milestone id.
    #[serde(default)]
    pub milestone_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub deliverables: Vec<String>,
    pub amount: f64,
    pub currency: String,
    pub voting_duration_days: i64,
    #[serde(default)]
    pub timeline_start: Option<chrono::DateTime<chrono::FixedOffset>>,
    #[serde(default)]
    pub timeline_end: Option<chrono::DateTime<chrono::FixedOffset>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignMilestones {
    pub object_id: String,
    pub milestones: Vec<milestone::Model>,
}

async fn resolve_campaign(db: &DatabaseConnection, reference: &str) -> Result<campaign::Model, ServiceError> {
    campaign::find_by_ref(db, reference)
        .await?
        .ok_or_else(|| ServiceError::not_found("campaign"))
}

/// Find a milestone of `campaign` by its UUID or on-chain milestone id.
async fn resolve_milestone(
    db: &DatabaseConnection,
    campaign: &campaign::Model,
    reference: &str,
) -> Result<milestone::Model, ServiceError> {
    let reference = reference.trim();
    let mut by = Condition::any().add(milestone::Column::OnChainMilestoneId.eq(reference));
    if let Ok(id) = Uuid::parse_str(reference) {
        by = by.add(milestone::Column::Id.eq(id));
    }
    milestone::Entity::find()
        .filter(milestone::Column::CampaignId.eq(campaign.id))
        .filter(by)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("milestone"))
}

#[instrument(skip(db, input), fields(title = %input.title))]
pub async fn create_milestone(db: &DatabaseConnection, input: NewMilestone) -> Result<milestone::Model, ServiceError> {
    let reference = input
        .campaign_id
        .as_deref()
        .or(input.object_id.as_deref())
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| ServiceError::validation("campaignId or objectId is required"))?;
    validate::required("title", &input.title)?;
    validate::required("currency", &input.currency)?;
    validate::positive_amount("amount", input.amount)?;
    if input.deliverables.is_empty() || input.deliverables.iter().any(|d| d.trim().is_empty()) {
        return Err(ServiceError::validation("deliverables must be a non-empty list of non-empty strings"));
    }
    if let (Some(start), Some(end)) = (input.timeline_start, input.timeline_end) {
        if end < start {
            return Err(ServiceError::validation("timelineEnd must not precede timelineStart"));
        }
    }
    let status = match input.status.as_deref() {
        Some(raw) => MilestoneStatus::parse(raw)?,
        None => MilestoneStatus::Pending,
    };

    let now = Utc::now();
    let voting_deadline = validate::days_after("votingDurationDays", now, input.voting_duration_days)?;

    let campaign = resolve_campaign(db, reference).await?;
    let created = milestone::ActiveModel {
        id: Set(Uuid::new_v4()),
        campaign_id: Set(campaign.id),
        on_chain_milestone_id: Set(input.milestone_id.filter(|m| !m.trim().is_empty())),
        title: Set(input.title.trim().to_string()),
        description: Set(input.description),
        deliverables: Set(Value::from(input.deliverables)),
        funding_goal: Set(input.amount),
        currency: Set(input.currency.trim().to_string()),
        status: Set(status),
        vote_result: Set(0),
        is_claimed: Set(false),
        timeline_start: Set(input.timeline_start),
        timeline_end: Set(input.timeline_end),
        voting_deadline: Set(voting_deadline.into()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await?;
    info!(campaign_id = %campaign.id, milestone_id = %created.id, status = created.status.as_str(), "milestone_created");
    Ok(created)
}

pub async fn milestones_of_campaign(db: &DatabaseConnection, object_id: &str) -> Result<CampaignMilestones, ServiceError> {
    validate::required("id", object_id)?;
    let campaign = resolve_campaign(db, object_id).await?;
    let milestones = milestone::Entity::find()
        .filter(milestone::Column::CampaignId.eq(campaign.id))
        .order_by_asc(milestone::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(CampaignMilestones { object_id: object_id.trim().to_string(), milestones })
}

/// Add `delta` to the vote tally. Only allowed while the milestone is in voting.
/// Returns the new tally.
#[instrument(skip(db))]
pub async fn update_vote_result(
    db: &DatabaseConnection,
    object_id: &str,
    milestone_ref: &str,
    delta: i64,
) -> Result<i64, ServiceError> {
    let campaign = resolve_campaign(db, object_id).await?;
    let target = resolve_milestone(db, &campaign, milestone_ref).await?;
    if target.vote_result.checked_add(delta).is_none() {
        warn!(milestone_id = %target.id, vote_result = target.vote_result, delta, "vote_out_of_range");
        return Err(ServiceError::validation("voteResult would overflow the vote tally"));
    }

    // the tally bound is repeated in the WHERE so a concurrent vote cannot push it past i64
    let headroom = if delta >= 0 {
        milestone::Column::VoteResult.lte(i64::MAX - delta)
    } else {
        milestone::Column::VoteResult.gte(i64::MIN - delta)
    };
    let res = milestone::Entity::update_many()
        .col_expr(milestone::Column::VoteResult, Expr::col(milestone::Column::VoteResult).add(delta))
        .col_expr(milestone::Column::UpdatedAt, Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now())))
        .filter(milestone::Column::Id.eq(target.id))
        .filter(milestone::Column::Status.eq(MilestoneStatus::InVoting))
        .filter(headroom)
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        let current = milestone::Entity::find_by_id(target.id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("milestone"))?;
        if current.status == MilestoneStatus::InVoting {
            warn!(milestone_id = %target.id, vote_result = current.vote_result, delta, "vote_out_of_range");
            return Err(ServiceError::validation("voteResult would overflow the vote tally"));
        }
        warn!(milestone_id = %target.id, status = current.status.as_str(), "vote_rejected");
        return Err(ServiceError::conflict("milestone status is not 'in-voting'; cannot update vote result"));
    }

    let updated = milestone::Entity::find_by_id(target.id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("milestone"))?;
    info!(milestone_id = %updated.id, vote_result = updated.vote_result, "vote_result_updated");
    Ok(updated.vote_result)
}

/// Mark an approved milestone as claimed.
#[instrument(skip(db))]
pub async fn claim(db: &DatabaseConnection, object_id: &str, milestone_ref: &str) -> Result<milestone::Model, ServiceError> {
    let campaign = resolve_campaign(db, object_id).await?;
    let target = resolve_milestone(db, &campaign, milestone_ref).await?;

    let res = milestone::Entity::update_many()
        .col_expr(milestone::Column::IsClaimed, Expr::value(true))
        .col_expr(milestone::Column::Status, Expr::value(MilestoneStatus::Claimed))
        .col_expr(milestone::Column::UpdatedAt, Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now())))
        .filter(milestone::Column::Id.eq(target.id))
        .filter(milestone::Column::Status.eq(MilestoneStatus::Approved))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        warn!(milestone_id = %target.id, status = target.status.as_str(), "claim_rejected");
        return Err(ServiceError::conflict("milestone status is not 'approved'; cannot update is_claimed"));
    }

    let claimed = milestone::Entity::find_by_id(target.id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("milestone"))?;
    info!(milestone_id = %claimed.id, "milestone_claimed");
    Ok(claimed)
}

/// Advance the voting lifecycle: `pending -> in-voting` or `in-voting -> approved`.
#[instrument(skip(db))]
pub async fn transition_status(
    db: &DatabaseConnection,
    object_id: &str,
    milestone_ref: &str,
    status: &str,
) -> Result<milestone::Model, ServiceError> {
    let next = MilestoneStatus::parse(status)?;
    let campaign = resolve_campaign(db, object_id).await?;
    let target = resolve_milestone(db, &campaign, milestone_ref).await?;

    let Some(from) = next.transition_source() else {
        return Err(ServiceError::conflict(format!("cannot move a milestone to '{}' through this operation", next.as_str())));
    };
    let res = milestone::Entity::update_many()
        .col_expr(milestone::Column::Status, Expr::value(next))
        .col_expr(milestone::Column::UpdatedAt, Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now())))
        .filter(milestone::Column::Id.eq(target.id))
        .filter(milestone::Column::Status.eq(from))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::conflict(format!(
            "milestone is '{}'; only '{}' may move to '{}'",
            target.status.as_str(),
            from.as_str(),
            next.as_str()
        )));
    }

    let moved = milestone::Entity::find_by_id(target.id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("milestone"))?;
    info!(milestone_id = %moved.id, from = from.as_str(), to = next.as_str(), "milestone_status_changed");
    Ok(moved)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::campaign_service::tests::{sample, seed};
    use crate::test_support::get_db;

    pub(crate) fn new_milestone(campaign_id: Uuid) -> NewMilestone {
        NewMilestone {
            campaign_id: Some(campaign_id.to_string()),
            object_id: None,
            milestone_id: Some("m-1".into()),
            title: "Prototype".into(),
            status: None,
            description: None,
            deliverables: vec!["working demo".into()],
            amount: 100.0,
            currency: "SUI".into(),
            voting_duration_days: 7,
            timeline_start: None,
            timeline_end: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_to_pending_with_deadline() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xm")).await?;
        let m = create_milestone(&db, new_milestone(c.id)).await?;
        assert_eq!(m.status, MilestoneStatus::Pending);
        assert_eq!(m.vote_result, 0);
        assert!(!m.is_claimed);
        assert_eq!((m.voting_deadline - m.created_at).num_days(), 7);
        assert_eq!(m.deliverables, serde_json::json!(["working demo"]));
        Ok(())
    }

    #[tokio::test]
    async fn create_validates_input() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xm2")).await?;

        let mut no_deliverables = new_milestone(c.id);
        no_deliverables.deliverables.clear();
        assert!(matches!(create_milestone(&db, no_deliverables).await.unwrap_err(), ServiceError::Validation(_)));

        let mut no_campaign = new_milestone(c.id);
        no_campaign.campaign_id = None;
        assert!(matches!(create_milestone(&db, no_campaign).await.unwrap_err(), ServiceError::Validation(_)));

        let mut zero_days = new_milestone(c.id);
        zero_days.voting_duration_days = 0;
        assert!(create_milestone(&db, zero_days).await.is_err());

        let mut far_deadline = new_milestone(c.id);
        far_deadline.voting_duration_days = 1_000_000_000;
        let err = create_milestone(&db, far_deadline).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(models::errors::ModelError::Validation(_))));
        assert!(milestone::Entity::find().all(&db).await?.is_empty());

        let mut unknown = new_milestone(Uuid::new_v4());
        unknown.title = "Ghost".into();
        assert!(matches!(create_milestone(&db, unknown).await.unwrap_err(), ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn vote_requires_in_voting_and_accumulates() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xvote")).await?;
        let m = create_milestone(&db, new_milestone(c.id)).await?;
        let cid = c.id.to_string();
        let mid = m.id.to_string();

        let rejected = update_vote_result(&db, &cid, &mid, 3).await.unwrap_err();
        assert!(matches!(rejected, ServiceError::Conflict(_)));

        transition_status(&db, &cid, &mid, "in-voting").await?;
        assert_eq!(update_vote_result(&db, &cid, &mid, 3).await?, 3);
        // on-chain milestone id works as well
        assert_eq!(update_vote_result(&db, &cid, "m-1", 2).await?, 5);
        Ok(())
    }

    #[tokio::test]
    async fn vote_overflow_is_rejected_and_tally_kept() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xoverflow")).await?;
        let m = create_milestone(&db, new_milestone(c.id)).await?;
        let cid = c.id.to_string();
        let mid = m.id.to_string();
        transition_status(&db, &cid, &mid, "in-voting").await?;
        assert_eq!(update_vote_result(&db, &cid, &mid, 10).await?, 10);

        let err = update_vote_result(&db, &cid, &mid, i64::MAX).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(update_vote_result(&db, &cid, &mid, -20).await?, -10);
        let err = update_vote_result(&db, &cid, &mid, i64::MIN).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let stored = milestone::Entity::find_by_id(m.id).one(&db).await?.unwrap();
        assert_eq!(stored.vote_result, -10);
        Ok(())
    }

    #[tokio::test]
    async fn claim_requires_approved() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xclaim")).await?;
        let m = create_milestone(&db, new_milestone(c.id)).await?;
        let cid = c.id.to_string();
        let mid = m.id.to_string();

        assert!(matches!(claim(&db, &cid, &mid).await.unwrap_err(), ServiceError::Conflict(_)));
        transition_status(&db, &cid, &mid, "in-voting").await?;
        assert!(matches!(claim(&db, &cid, &mid).await.unwrap_err(), ServiceError::Conflict(_)));
        transition_status(&db, &cid, &mid, "approved").await?;

        let claimed = claim(&db, &cid, &mid).await?;
        assert!(claimed.is_claimed);
        assert_eq!(claimed.status, MilestoneStatus::Claimed);
        // second claim finds it no longer approved
        assert!(matches!(claim(&db, &cid, &mid).await.unwrap_err(), ServiceError::Conflict(_)));
        Ok(())
    }

    #[tokio::test]
    async fn transitions_cannot_skip_or_rewind() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xflow")).await?;
        let m = create_milestone(&db, new_milestone(c.id)).await?;
        let cid = c.id.to_string();
        let mid = m.id.to_string();

        assert!(matches!(transition_status(&db, &cid, &mid, "approved").await.unwrap_err(), ServiceError::Conflict(_)));
        assert!(matches!(transition_status(&db, &cid, &mid, "claimed").await.unwrap_err(), ServiceError::Conflict(_)));
        assert!(matches!(transition_status(&db, &cid, &mid, "pending").await.unwrap_err(), ServiceError::Conflict(_)));
        assert!(matches!(transition_status(&db, &cid, &mid, "bogus").await.unwrap_err(), ServiceError::Model(_)));
        Ok(())
    }

    #[tokio::test]
    async fn missing_milestone_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xnm")).await?;
        let err = update_vote_result(&db, &c.id.to_string(), &Uuid::new_v4().to_string(), 1).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        let listed = milestones_of_campaign(&db, &c.id.to_string()).await?;
        assert!(listed.milestones.is_empty());
        Ok(())
    }
}
