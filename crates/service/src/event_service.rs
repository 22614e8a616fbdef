use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use models::event::{self, EventStatus};
use models::milestone::MilestoneStatus;
use models::{event_image, event_milestone, event_service, service_item, user, validate};

use crate::errors::ServiceError;
use crate::loaders::group_by;
use crate::pagination::Pagination;

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub creator_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: chrono::DateTime<chrono::FixedOffset>,
    pub end_time: chrono::DateTime<chrono::FixedOffset>,
    pub funding_deadline: chrono::DateTime<chrono::FixedOffset>,
    pub timezone: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    pub target_amount: f64,
    pub reward_type: String,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub ticket_price: Option<f64>,
    #[serde(default)]
    pub status: Option<EventStatus>,
    #[serde(default)]
    pub milestones: Vec<NewEventMilestone>,
    /// Catalog service ids.
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub gallery_images: Vec<NewEventImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEventMilestone {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub funding_goal: f64,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEventImage {
    pub image_url: String,
    #[serde(default)]
    pub is_cover: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedEvent {
    pub event_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventWithImages {
    #[serde(flatten)]
    pub event: event::Model,
    pub gallery_images: Vec<event_image::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: event::Model,
    pub milestones: Vec<event_milestone::Model>,
    pub services: Vec<service_item::Model>,
    pub gallery_images: Vec<event_image::Model>,
}

fn validate_new_event(input: &NewEvent) -> Result<(), ServiceError> {
    validate::required("name", &input.name)?;
    validate::required("timezone", &input.timezone)?;
    validate::required("reward_type", &input.reward_type)?;
    validate::positive_amount("target_amount", input.target_amount)?;
    if input.end_time < input.start_time {
        return Err(ServiceError::validation("end_time must not precede start_time"));
    }
    if let Some(capacity) = input.capacity {
        validate::at_least("capacity", capacity as i64, 1)?;
    }
    if let Some(price) = input.ticket_price {
        if !price.is_finite() || price < 0.0 {
            return Err(ServiceError::validation("ticket_price must not be negative"));
        }
    }
    for m in &input.milestones {
        validate::required("milestones.title", &m.title)?;
        validate::positive_amount("milestones.funding_goal", m.funding_goal)?;
        if let Some(s) = &m.status {
            MilestoneStatus::parse(s)?;
        }
    }
    for g in &input.gallery_images {
        validate::required("gallery_images.image_url", &g.image_url)?;
    }
    Ok(())
}

/// Create an event with its milestones, service links and gallery in one transaction.
#[instrument(skip(db, input), fields(creator_id = %input.creator_id, name = %input.name))]
pub async fn create_event(db: &DatabaseConnection, input: NewEvent) -> Result<CreatedEvent, ServiceError> {
    validate_new_event(&input)?;

    let txn = db.begin().await?;
    user::Entity::find_by_id(input.creator_id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("creator"))?;

    let service_ids: BTreeSet<String> = input.services.iter().map(|s| s.trim().to_string()).collect();
    if !service_ids.is_empty() {
        let found = service_item::Entity::find()
            .filter(service_item::Column::Id.is_in(service_ids.iter().cloned()))
            .count(&txn)
            .await?;
        if found != service_ids.len() as u64 {
            return Err(ServiceError::NotFound("one or more services not found".into()));
        }
    }

    let now = Utc::now();
    let event_id = Uuid::new_v4();
    event::ActiveModel {
        id: Set(event_id),
        creator_id: Set(input.creator_id),
        name: Set(input.name.trim().to_string()),
        description: Set(input.description.clone()),
        start_time: Set(input.start_time),
        end_time: Set(input.end_time),
        funding_deadline: Set(input.funding_deadline),
        timezone: Set(input.timezone.trim().to_string()),
        location: Set(input.location.clone()),
        visibility: Set(input.visibility.clone().unwrap_or_else(|| "public".to_string())),
        target_amount: Set(input.target_amount),
        amount_raised: Set(0.0),
        reward_type: Set(input.reward_type.trim().to_string()),
        capacity: Set(input.capacity),
        ticket_price: Set(input.ticket_price),
        status: Set(input.status.unwrap_or_default()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    if !input.milestones.is_empty() {
        let mut rows = Vec::with_capacity(input.milestones.len());
        for m in &input.milestones {
            rows.push(event_milestone::ActiveModel {
                id: Set(Uuid::new_v4()),
                event_id: Set(event_id),
                title: Set(m.title.clone()),
                description: Set(m.description.clone()),
                funding_goal: Set(m.funding_goal),
                status: Set(match m.status.as_deref() {
                    Some(s) => MilestoneStatus::parse(s)?,
                    None => MilestoneStatus::Pending,
                }),
            });
        }
        event_milestone::Entity::insert_many(rows).exec_without_returning(&txn).await?;
    }

    if !service_ids.is_empty() {
        let rows = service_ids.iter().map(|sid| event_service::ActiveModel {
            id: Set(Uuid::new_v4()),
            event_id: Set(event_id),
            service_id: Set(sid.clone()),
        });
        event_service::Entity::insert_many(rows).exec_without_returning(&txn).await?;
    }

    if !input.gallery_images.is_empty() {
        let rows = input.gallery_images.iter().map(|g| event_image::ActiveModel {
            id: Set(Uuid::new_v4()),
            event_id: Set(event_id),
            image_url: Set(g.image_url.clone()),
            is_cover: Set(g.is_cover),
        });
        event_image::Entity::insert_many(rows).exec_without_returning(&txn).await?;
    }

    txn.commit().await?;
    info!(%event_id, services = service_ids.len(), "event_created");
    Ok(CreatedEvent { event_id })
}

pub async fn list_events(db: &DatabaseConnection, page: Pagination) -> Result<Vec<EventWithImages>, ServiceError> {
    let events = event::Entity::find()
        .order_by_desc(event::Column::CreatedAt)
        .limit(page.limit)
        .offset(page.offset)
        .all(db)
        .await?;
    if events.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
    let images = event_image::Entity::find()
        .filter(event_image::Column::EventId.is_in(ids))
        .all(db)
        .await?;
    let mut images = group_by(images, |i| i.event_id);
    Ok(events
        .into_iter()
        .map(|e| EventWithImages { gallery_images: images.remove(&e.id).unwrap_or_default(), event: e })
        .collect())
}

pub async fn event_details(db: &DatabaseConnection, id: Uuid) -> Result<EventDetails, ServiceError> {
    let event = event::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("event"))?;

    let (milestones, links, gallery_images) = tokio::try_join!(
        event_milestone::Entity::find().filter(event_milestone::Column::EventId.eq(id)).all(db),
        event_service::Entity::find().filter(event_service::Column::EventId.eq(id)).all(db),
        event_image::Entity::find().filter(event_image::Column::EventId.eq(id)).all(db),
    )?;
    let services = if links.is_empty() {
        Vec::new()
    } else {
        service_item::Entity::find()
            .filter(service_item::Column::Id.is_in(links.into_iter().map(|l| l.service_id)))
            .order_by_asc(service_item::Column::Name)
            .all(db)
            .await?
    };
    Ok(EventDetails { event, milestones, services, gallery_images })
}
