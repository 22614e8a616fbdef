use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::campaign;
use crate::errors::ModelError;
use crate::validate;

/// Milestone lifecycle. Forward-only: `pending -> in-voting -> approved -> claimed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "kebab-case")]
pub enum MilestoneStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in-voting")]
    InVoting,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "claimed")]
    Claimed,
}

impl MilestoneStatus {
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        validate::one_of("status", raw, &["pending", "in-voting", "approved", "claimed"])?;
        Ok(match raw.trim().to_ascii_lowercase().as_str() {
            "in-voting" => MilestoneStatus::InVoting,
            "approved" => MilestoneStatus::Approved,
            "claimed" => MilestoneStatus::Claimed,
            _ => MilestoneStatus::Pending,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::Pending => "pending",
            MilestoneStatus::InVoting => "in-voting",
            MilestoneStatus::Approved => "approved",
            MilestoneStatus::Claimed => "claimed",
        }
    }

    /// The status a milestone must hold before it may move to `self`
    /// through the status endpoint. Claiming has its own operation.
    pub fn transition_source(&self) -> Option<MilestoneStatus> {
        match self {
            MilestoneStatus::InVoting => Some(MilestoneStatus::Pending),
            MilestoneStatus::Approved => Some(MilestoneStatus::InVoting),
            MilestoneStatus::Pending | MilestoneStatus::Claimed => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "milestones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub on_chain_milestone_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    /// JSON array of deliverable descriptions.
    pub deliverables: Json,
    pub funding_goal: f64,
    pub currency: String,
    pub status: MilestoneStatus,
    pub vote_result: i64,
    pub is_claimed: bool,
    pub timeline_start: Option<DateTimeWithTimeZone>,
    pub timeline_end: Option<DateTimeWithTimeZone>,
    pub voting_deadline: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Campaign }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Campaign => Entity::belongs_to(campaign::Entity).from(Column::CampaignId).to(campaign::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
