use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{event, service_item};

/// Link row between an event and a catalog service.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_id: Uuid,
    pub service_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Event, Service }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Event => Entity::belongs_to(event::Entity).from(Column::EventId).to(event::Column::Id).into(),
            Relation::Service => Entity::belongs_to(service_item::Entity).from(Column::ServiceId).to(service_item::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
