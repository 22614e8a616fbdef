use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::campaign;

/// Kind given to images attached at campaign creation.
pub const KIND_GALLERY: &str = "gallery";

/// Campaign picture: gallery entries from creation and `/upload-image` uploads.
/// `image_ref` is either a URL or a storage blob id.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campaign_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub image_ref: String,
    pub kind: String,
    pub is_cover: bool,
    pub created_at: DateTimeWithTimeZone,
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
