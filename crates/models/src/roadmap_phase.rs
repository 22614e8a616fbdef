use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::campaign;
use crate::errors::ModelError;
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "kebab-case")]
pub enum PhaseState {
    #[sea_orm(string_value = "done")]
    Done,
    #[sea_orm(string_value = "in-progress")]
    InProgress,
    #[sea_orm(string_value = "future")]
    Future,
}

impl PhaseState {
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        validate::one_of("state", raw, &["done", "in-progress", "future"])?;
        Ok(match raw.trim().to_ascii_lowercase().as_str() {
            "done" => PhaseState::Done,
            "in-progress" => PhaseState::InProgress,
            _ => PhaseState::Future,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campaign_roadmap_phases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub title: String,
    pub timeline: String,
    pub description: String,
    pub state: PhaseState,
    pub display_order: i32,
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
