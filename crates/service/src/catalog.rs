//! Event-service catalog. The only entity that supports deletion.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;

use models::{service_item, validate};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct NewServiceItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub base_cost: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub popular: Option<bool>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_cost: Option<f64>,
    pub category: Option<String>,
    pub popular: Option<bool>,
}

fn validate_cost(cost: f64) -> Result<(), ServiceError> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(ServiceError::validation("base_cost must be a non-negative number"));
    }
    Ok(())
}

pub async fn create_service(db: &DatabaseConnection, input: NewServiceItem) -> Result<service_item::Model, ServiceError> {
    validate::required("id", &input.id)?;
    validate::required("name", &input.name)?;
    validate_cost(input.base_cost)?;
    let id = input.id.trim().to_string();
    if service_item::Entity::find_by_id(id.clone()).one(db).await?.is_some() {
        return Err(ServiceError::conflict(format!("service '{id}' already exists")));
    }
    let now = Utc::now();
    let created = service_item::ActiveModel {
        id: Set(id),
        name: Set(input.name.trim().to_string()),
        description: Set(input.description),
        base_cost: Set(input.base_cost),
        category: Set(input.category),
        popular: Set(input.popular.unwrap_or(false)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await?;
    info!(service_id = %created.id, "service_created");
    Ok(created)
}

pub async fn list_services(db: &DatabaseConnection) -> Result<Vec<service_item::Model>, ServiceError> {
    Ok(service_item::Entity::find()
        .order_by_asc(service_item::Column::Name)
        .all(db)
        .await?)
}

pub async fn get_service(db: &DatabaseConnection, id: &str) -> Result<service_item::Model, ServiceError> {
    service_item::Entity::find_by_id(id.trim().to_string())
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("service"))
}

pub async fn update_service(
    db: &DatabaseConnection,
    id: &str,
    patch: ServiceItemPatch,
) -> Result<service_item::Model, ServiceError> {
    let mut am: service_item::ActiveModel = get_service(db, id).await?.into();
    if let Some(name) = patch.name {
        validate::required("name", &name)?;
        am.name = Set(name.trim().to_string());
    }
    if let Some(d) = patch.description { am.description = Set(Some(d)); }
    if let Some(cost) = patch.base_cost {
        validate_cost(cost)?;
        am.base_cost = Set(cost);
    }
    if let Some(c) = patch.category { am.category = Set(Some(c)); }
    if let Some(p) = patch.popular { am.popular = Set(p); }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete_service(db: &DatabaseConnection, id: &str) -> Result<(), ServiceError> {
    let res = service_item::Entity::delete_by_id(id.trim().to_string()).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("service"));
    }
    info!(service_id = %id, "service_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn av() -> NewServiceItem {
        NewServiceItem {
            id: "av".into(),
            name: "Audio/Visual".into(),
            description: Some("Projector and PA".into()),
            base_cost: 150.0,
            category: Some("equipment".into()),
            popular: Some(true),
        }
    }

    #[tokio::test]
    async fn crud_cycle() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_service(&db, av()).await?;
        assert!(matches!(create_service(&db, av()).await.unwrap_err(), ServiceError::Conflict(_)));

        let updated = update_service(&db, "av", ServiceItemPatch { base_cost: Some(175.0), ..Default::default() }).await?;
        assert_eq!(updated.base_cost, 175.0);
        assert_eq!(updated.name, "Audio/Visual");
        assert_eq!(list_services(&db).await?.len(), 1);

        delete_service(&db, "av").await?;
        assert!(matches!(get_service(&db, "av").await.unwrap_err(), ServiceError::NotFound(_)));
        assert!(matches!(delete_service(&db, "av").await.unwrap_err(), ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = update_service(&db, "ghost", ServiceItemPatch::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }
}
