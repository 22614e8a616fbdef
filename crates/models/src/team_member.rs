use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::campaign;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campaign_team_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub name: String,
    pub role: String,
    /// Free-form object of contact handles, e.g. `{"twitter": "@x"}`.
    pub contact_info: Json,
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
