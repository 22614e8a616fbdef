use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::{campaign, tier, validate};

use crate::errors::ServiceError;

/// `POST /add-tier` body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTier {
    pub campaign_id: String,
    pub tier: String,
    pub limit: i32,
    #[serde(default)]
    pub description: Option<String>,
}

/// Add a reward tier. New tiers start inactive with nothing claimed.
pub async fn add_tier(db: &DatabaseConnection, input: NewTier) -> Result<tier::Model, ServiceError> {
    validate::required("campaign_id", &input.campaign_id)?;
    validate::required("tier", &input.tier)?;
    validate::at_least("limit", input.limit as i64, 1)?;

    let campaign = campaign::find_by_ref(db, &input.campaign_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("campaign"))?;
    let name = input.tier.trim().to_string();
    let exists = tier::Entity::find()
        .filter(tier::Column::CampaignId.eq(campaign.id))
        .filter(tier::Column::Name.eq(name.as_str()))
        .one(db)
        .await?;
    if exists.is_some() {
        return Err(ServiceError::conflict(format!("tier '{name}' already exists for this campaign")));
    }

    let created = tier::ActiveModel {
        id: Set(Uuid::new_v4()),
        campaign_id: Set(campaign.id),
        name: Set(name),
        description: Set(input.description),
        supply_limit: Set(input.limit),
        current: Set(0),
        is_active: Set(false),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await?;
    info!(campaign_id = %campaign.id, tier = %created.name, limit = created.supply_limit, "tier_added");
    Ok(created)
}

pub async fn list_tiers(db: &DatabaseConnection, campaign_ref: &str) -> Result<Vec<tier::Model>, ServiceError> {
    validate::required("campaign_id", campaign_ref)?;
    let campaign = campaign::find_by_ref(db, campaign_ref)
        .await?
        .ok_or_else(|| ServiceError::not_found("campaign"))?;
    Ok(tier::Entity::find()
        .filter(tier::Column::CampaignId.eq(campaign.id))
        .order_by_asc(tier::Column::CreatedAt)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign_service::tests::{sample, seed};
    use crate::test_support::get_db;

    fn gold(campaign_id: Uuid) -> NewTier {
        NewTier { campaign_id: campaign_id.to_string(), tier: "Gold".into(), limit: 2, description: None }
    }

    #[tokio::test]
    async fn add_tier_starts_empty_and_inactive() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xtier")).await?;
        let t = add_tier(&db, gold(c.id)).await?;
        assert_eq!(t.current, 0);
        assert!(!t.is_active);
        assert_eq!(t.supply_limit, 2);
        assert_eq!(list_tiers(&db, &c.id.to_string()).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_name_conflicts_and_zero_limit_is_invalid() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xtier2")).await?;
        add_tier(&db, gold(c.id)).await?;
        assert!(matches!(add_tier(&db, gold(c.id)).await.unwrap_err(), ServiceError::Conflict(_)));

        let mut zero = gold(c.id);
        zero.tier = "Silver".into();
        zero.limit = 0;
        assert!(matches!(add_tier(&db, zero).await.unwrap_err(), ServiceError::Model(_)));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_campaign_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = add_tier(&db, gold(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }

    #[test]
    fn tier_serializes_limit_field() {
        let now = Utc::now().into();
        let t = tier::Model {
            id: Uuid::nil(),
            campaign_id: Uuid::nil(),
            name: "Gold".into(),
            description: None,
            supply_limit: 5,
            current: 1,
            is_active: false,
            created_at: now,
        };
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["limit"], 5);
        assert!(v.get("supply_limit").is_none());
    }
}
