use sea_orm::{entity::prelude::*, Condition, ConnectionTrait};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum RewardType {
    #[default]
    #[sea_orm(string_value = "none")]
    None,
    #[sea_orm(string_value = "token")]
    Token,
    #[sea_orm(string_value = "nft")]
    Nft,
}

impl RewardType {
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        validate::one_of("reward_type", raw, &["none", "token", "nft"])?;
        Ok(match raw.trim().to_ascii_lowercase().as_str() {
            "token" => RewardType::Token,
            "nft" => RewardType::Nft,
            _ => RewardType::None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub creator_id: Uuid,
    #[sea_orm(unique)]
    pub on_chain_object_id: Option<String>,
    pub title: String,
    pub short_description: Option<String>,
    pub category: String,
    pub goal_amount: f64,
    pub current_amount: f64,
    pub currency: String,
    pub duration_days: i32,
    pub end_date: DateTimeWithTimeZone,
    pub reward_type: RewardType,
    pub status: CampaignStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Creator,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Creator => Entity::belongs_to(user::Entity).from(Column::CreatorId).to(user::Column::Id).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::Creator.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Resolve a campaign reference: its UUID or its on-chain object id.
pub async fn find_by_ref<C: ConnectionTrait>(db: &C, reference: &str) -> Result<Option<Model>, ModelError> {
    let reference = reference.trim();
    let mut cond = Condition::any().add(Column::OnChainObjectId.eq(reference));
    if let Ok(id) = Uuid::parse_str(reference) {
        cond = cond.add(Column::Id.eq(id));
    }
    Ok(Entity::find().filter(cond).one(db).await?)
}
