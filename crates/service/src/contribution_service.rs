use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::campaign::{self, CampaignStatus};
use models::{campaign_image, contribution, event, tier, user, validate};

use crate::errors::ServiceError;
use crate::loaders;

/// `POST /contributions` body. Exactly one of `campaignId` / `eventId`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContribution {
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub event_id: Option<Uuid>,
    pub wallet_address: String,
    pub amount: f64,
    pub tx_hash: String,
    #[serde(default)]
    pub tier_type: Option<String>,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContributionReceipt {
    pub contribution: contribution::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_current_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_amount_raised: Option<f64>,
}

/// Campaign summary attached to a wallet's contributions.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignCard {
    #[serde(flatten)]
    pub campaign: campaign::Model,
    pub cover_image: Option<campaign_image::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContributionWithCampaign {
    #[serde(flatten)]
    pub contribution: contribution::Model,
    pub campaign: Option<CampaignCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletContributions {
    pub contributions: Vec<ContributionWithCampaign>,
    pub total_contributed: f64,
}

enum Target {
    Campaign(campaign::Model),
    Event(event::Model),
}

fn validate_new_contribution(input: &NewContribution) -> Result<(), ServiceError> {
    let has_campaign = input.campaign_id.as_deref().is_some_and(|c| !c.trim().is_empty());
    match (has_campaign, input.event_id.is_some()) {
        (true, true) => return Err(ServiceError::validation("provide either campaignId or eventId, not both")),
        (false, false) => return Err(ServiceError::validation("campaignId or eventId is required")),
        _ => {}
    }
    validate::required("walletAddress", &input.wallet_address)?;
    validate::required("txHash", &input.tx_hash)?;
    validate::required("currency", &input.currency)?;
    validate::positive_amount("amount", input.amount)?;
    Ok(())
}

/// Record a contribution and bump the target's running total atomically.
///
/// All writes share one transaction: the lazily created user, the
/// contribution row, the `amount = amount + delta` increment, the tier
/// counter and the campaign's completion flag. Any failure rolls back all.
#[instrument(skip(db, input), fields(wallet = %input.wallet_address, tx = %input.tx_hash, amount = input.amount))]
pub async fn create_contribution(db: &DatabaseConnection, input: NewContribution) -> Result<ContributionReceipt, ServiceError> {
    validate_new_contribution(&input)?;

    let txn = db.begin().await?;
    let contributor = user::find_or_create_by_wallet(&txn, input.wallet_address.trim()).await?;

    let target = match (&input.campaign_id, input.event_id) {
        (Some(reference), _) if !reference.trim().is_empty() => Target::Campaign(
            campaign::find_by_ref(&txn, reference)
                .await?
                .ok_or_else(|| ServiceError::not_found("campaign"))?,
        ),
        (_, Some(event_id)) => Target::Event(
            event::Entity::find_by_id(event_id)
                .one(&txn)
                .await?
                .ok_or_else(|| ServiceError::not_found("event"))?,
        ),
        _ => return Err(ServiceError::validation("campaignId or eventId is required")),
    };

    let tx_hash = input.tx_hash.trim().to_string();
    let duplicate = contribution::Entity::find()
        .filter(contribution::Column::TransactionHash.eq(tx_hash.as_str()))
        .one(&txn)
        .await?;
    if duplicate.is_some() {
        warn!(tx = %tx_hash, "duplicate_transaction_hash");
        return Err(ServiceError::conflict(format!("transaction {tx_hash} was already recorded")));
    }

    let tier_name = input.tier_type.as_deref().map(str::trim).filter(|t| !t.is_empty()).map(str::to_string);
    let saved = contribution::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(contributor.id),
        campaign_id: Set(match &target { Target::Campaign(c) => Some(c.id), Target::Event(_) => None }),
        event_id: Set(match &target { Target::Event(e) => Some(e.id), Target::Campaign(_) => None }),
        amount: Set(input.amount),
        transaction_hash: Set(tx_hash),
        currency: Set(input.currency.trim().to_string()),
        tier: Set(tier_name.clone()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    let receipt = match target {
        Target::Campaign(c) => {
            let current = credit_campaign(&txn, &c, input.amount).await?;
            if let Some(name) = tier_name.as_deref() {
                claim_tier_slot(&txn, c.id, name).await?;
            }
            ContributionReceipt { contribution: saved, campaign_current_amount: Some(current), event_amount_raised: None }
        }
        Target::Event(e) => {
            let raised = credit_event(&txn, &e, input.amount).await?;
            ContributionReceipt { contribution: saved, campaign_current_amount: None, event_amount_raised: Some(raised) }
        }
    };

    txn.commit().await?;
    info!(
        contribution_id = %receipt.contribution.id,
        campaign_current_amount = ?receipt.campaign_current_amount,
        event_amount_raised = ?receipt.event_amount_raised,
        "contribution_recorded"
    );
    Ok(receipt)
}

/// Atomic increment of `current_amount`; flips the campaign to completed
/// once the goal is reached. Returns the new amount.
async fn credit_campaign<C: ConnectionTrait>(db: &C, c: &campaign::Model, amount: f64) -> Result<f64, ServiceError> {
    finite_total("current_amount", c.current_amount + amount)?;
    campaign::Entity::update_many()
        .col_expr(campaign::Column::CurrentAmount, Expr::col(campaign::Column::CurrentAmount).add(amount))
        .col_expr(campaign::Column::UpdatedAt, Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now())))
        .filter(campaign::Column::Id.eq(c.id))
        .exec(db)
        .await?;
    let fresh = campaign::Entity::find_by_id(c.id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("campaign"))?;
    // a concurrent credit may have moved the total since `c` was read
    finite_total("current_amount", fresh.current_amount)?;
    if fresh.status == CampaignStatus::Active && fresh.current_amount >= fresh.goal_amount {
        campaign::Entity::update_many()
            .col_expr(campaign::Column::Status, Expr::value(CampaignStatus::Completed))
            .filter(campaign::Column::Id.eq(c.id))
            .filter(campaign::Column::Status.eq(CampaignStatus::Active))
            .exec(db)
            .await?;
        info!(campaign_id = %c.id, current_amount = fresh.current_amount, "campaign_goal_reached");
    }
    Ok(fresh.current_amount)
}

async fn credit_event<C: ConnectionTrait>(db: &C, e: &event::Model, amount: f64) -> Result<f64, ServiceError> {
    finite_total("amount_raised", e.amount_raised + amount)?;
    event::Entity::update_many()
        .col_expr(event::Column::AmountRaised, Expr::col(event::Column::AmountRaised).add(amount))
        .col_expr(event::Column::UpdatedAt, Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now())))
        .filter(event::Column::Id.eq(e.id))
        .exec(db)
        .await?;
    let fresh = event::Entity::find_by_id(e.id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("event"))?;
    finite_total("amount_raised", fresh.amount_raised)?;
    Ok(fresh.amount_raised)
}

/// Running totals must stay representable; an error here rolls the transaction back.
fn finite_total(field: &str, total: f64) -> Result<(), ServiceError> {
    if total.is_finite() {
        Ok(())
    } else {
        Err(ServiceError::validation(format!("amount would push {field} out of range")))
    }
}

/// Count one more holder of a named tier. Unknown tier names are ignored;
/// a tier at its limit rejects the contribution.
async fn claim_tier_slot<C: ConnectionTrait>(db: &C, campaign_id: Uuid, name: &str) -> Result<(), ServiceError> {
    let Some(t) = tier::Entity::find()
        .filter(tier::Column::CampaignId.eq(campaign_id))
        .filter(tier::Column::Name.eq(name))
        .one(db)
        .await?
    else {
        return Ok(());
    };
    if t.is_full() {
        return Err(ServiceError::conflict(format!("tier '{name}' is full")));
    }
    let res = tier::Entity::update_many()
        .col_expr(tier::Column::Current, Expr::col(tier::Column::Current).add(1))
        .filter(tier::Column::Id.eq(t.id))
        .filter(Expr::col(tier::Column::Current).lt(Expr::col(tier::Column::SupplyLimit)))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::conflict(format!("tier '{name}' is full")));
    }
    Ok(())
}

/// Everything a wallet contributed, each with its campaign and cover image.
pub async fn contributions_by_wallet(db: &DatabaseConnection, address: &str) -> Result<WalletContributions, ServiceError> {
    validate::required("address", address)?;
    let Some(owner) = user::find_by_wallet(db, address.trim()).await? else {
        return Ok(WalletContributions { contributions: Vec::new(), total_contributed: 0.0 });
    };
    let rows = contribution::Entity::find()
        .filter(contribution::Column::UserId.eq(owner.id))
        .order_by_desc(contribution::Column::CreatedAt)
        .all(db)
        .await?;

    let campaign_ids: Vec<Uuid> = rows
        .iter()
        .filter_map(|r| r.campaign_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let campaigns = if campaign_ids.is_empty() {
        Vec::new()
    } else {
        campaign::Entity::find()
            .filter(campaign::Column::Id.is_in(campaign_ids.clone()))
            .all(db)
            .await?
    };
    let images = loaders::images_for(db, &campaign_ids).await?;
    let cards: HashMap<Uuid, CampaignCard> = campaigns
        .into_iter()
        .map(|c| {
            let cover_image = images.get(&c.id).and_then(|imgs| loaders::cover_of(imgs));
            (c.id, CampaignCard { campaign: c, cover_image })
        })
        .collect();

    let total_contributed = rows.iter().map(|r| r.amount).sum();
    let contributions = rows
        .into_iter()
        .map(|r| ContributionWithCampaign {
            campaign: r.campaign_id.and_then(|id| cards.get(&id).cloned()),
            contribution: r,
        })
        .collect();
    Ok(WalletContributions { contributions, total_contributed })
}

pub async fn contributions_by_campaign(db: &DatabaseConnection, campaign_ref: &str) -> Result<Vec<contribution::Model>, ServiceError> {
    validate::required("campaign_id", campaign_ref)?;
    let c = campaign::find_by_ref(db, campaign_ref)
        .await?
        .ok_or_else(|| ServiceError::not_found("campaign"))?;
    Ok(contribution::Entity::find()
        .filter(contribution::Column::CampaignId.eq(c.id))
        .order_by_desc(contribution::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn contributions_by_event(db: &DatabaseConnection, event_id: Uuid) -> Result<Vec<contribution::Model>, ServiceError> {
    event::Entity::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("event"))?;
    Ok(contribution::Entity::find()
        .filter(contribution::Column::EventId.eq(event_id))
        .order_by_desc(contribution::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn all_contributions(db: &DatabaseConnection) -> Result<Vec<contribution::Model>, ServiceError> {
    Ok(contribution::Entity::find()
        .order_by_desc(contribution::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn all_campaign_contributions(db: &DatabaseConnection) -> Result<Vec<contribution::Model>, ServiceError> {
    Ok(contribution::Entity::find()
        .filter(contribution::Column::CampaignId.is_not_null())
        .order_by_desc(contribution::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn all_event_contributions(db: &DatabaseConnection) -> Result<Vec<contribution::Model>, ServiceError> {
    Ok(contribution::Entity::find()
        .filter(contribution::Column::EventId.is_not_null())
        .order_by_desc(contribution::Column::CreatedAt)
        .all(db)
        .await?)
}

/// Distinct contributor wallets of a campaign, sorted.
pub async fn addresses_by_campaign(db: &DatabaseConnection, campaign_ref: &str) -> Result<Vec<String>, ServiceError> {
    let rows = contributions_by_campaign(db, campaign_ref).await?;
    let user_ids: Vec<Uuid> = rows.iter().map(|r| r.user_id).collect::<BTreeSet<_>>().into_iter().collect();
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }
    let wallets: BTreeSet<String> = user::Entity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| u.wallet_address)
        .collect();
    Ok(wallets.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign_service::tests::{sample, seed};
    use crate::test_support::get_db;
    use crate::tier_service::{add_tier, NewTier};

    fn pay(campaign: &campaign::Model, wallet: &str, amount: f64, tx: &str) -> NewContribution {
        NewContribution {
            campaign_id: Some(campaign.id.to_string()),
            event_id: None,
            wallet_address: wallet.into(),
            amount,
            tx_hash: tx.into(),
            tier_type: None,
            currency: "SUI".into(),
        }
    }

    async fn reload(db: &DatabaseConnection, id: Uuid) -> Result<campaign::Model, anyhow::Error> {
        Ok(campaign::Entity::find_by_id(id).one(db).await?.ok_or_else(|| anyhow::anyhow!("gone"))?)
    }

    #[tokio::test]
    async fn contribution_increases_campaign_amount_exactly() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xowner")).await?;
        let receipt = create_contribution(&db, pay(&c, "0xfan", 42.5, "tx-1")).await?;
        assert_eq!(receipt.campaign_current_amount, Some(42.5));
        assert_eq!(reload(&db, c.id).await?.current_amount, 42.5);

        create_contribution(&db, pay(&c, "0xfan2", 7.5, "tx-2")).await?;
        assert_eq!(reload(&db, c.id).await?.current_amount, 50.0);
        // unseen wallets become users
        assert!(user::find_by_wallet(&db, "0xfan2").await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_hash_is_rejected_and_amount_unchanged() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xowner")).await?;
        create_contribution(&db, pay(&c, "0xfan", 10.0, "tx-dup")).await?;
        let err = create_contribution(&db, pay(&c, "0xother", 99.0, "tx-dup")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(reload(&db, c.id).await?.current_amount, 10.0);
        // the rolled back transaction did not leave the new wallet behind
        assert!(user::find_by_wallet(&db, "0xother").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn both_or_neither_target_is_invalid() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xowner")).await?;
        let mut both = pay(&c, "0xfan", 1.0, "tx-b");
        both.event_id = Some(Uuid::new_v4());
        assert!(matches!(create_contribution(&db, both).await.unwrap_err(), ServiceError::Validation(_)));

        let mut neither = pay(&c, "0xfan", 1.0, "tx-n");
        neither.campaign_id = None;
        assert!(matches!(create_contribution(&db, neither).await.unwrap_err(), ServiceError::Validation(_)));

        let mut zero = pay(&c, "0xfan", 0.0, "tx-z");
        zero.amount = 0.0;
        assert!(matches!(create_contribution(&db, zero).await.unwrap_err(), ServiceError::Model(_)));
        Ok(())
    }

    #[tokio::test]
    async fn reaching_goal_completes_campaign() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xowner")).await?;
        create_contribution(&db, pay(&c, "0xwhale", 500.0, "tx-goal")).await?;
        assert_eq!(reload(&db, c.id).await?.status, CampaignStatus::Completed);
        Ok(())
    }

    #[tokio::test]
    async fn unrepresentable_total_is_rejected_and_rolled_back() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xowner")).await?;
        create_contribution(&db, pay(&c, "0xwhale", 1e308, "tx-big-1")).await?;

        let fresh = reload(&db, c.id).await?;
        let err = create_contribution(&db, pay(&fresh, "0xwhale2", 1e308, "tx-big-2")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(reload(&db, c.id).await?.current_amount, 1e308);
        let stored = contribution::Entity::find()
            .filter(contribution::Column::TransactionHash.eq("tx-big-2"))
            .one(&db)
            .await?;
        assert!(stored.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn full_tier_rejects_contribution() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xowner")).await?;
        add_tier(&db, NewTier { campaign_id: c.id.to_string(), tier: "Gold".into(), limit: 1, description: None }).await?;

        let mut first = pay(&c, "0xa", 5.0, "tx-t1");
        first.tier_type = Some("Gold".into());
        create_contribution(&db, first).await?;

        let mut second = pay(&c, "0xb", 5.0, "tx-t2");
        second.tier_type = Some("Gold".into());
        assert!(matches!(create_contribution(&db, second).await.unwrap_err(), ServiceError::Conflict(_)));
        assert_eq!(reload(&db, c.id).await?.current_amount, 5.0);
        Ok(())
    }

    #[tokio::test]
    async fn wallet_listing_carries_campaign_and_total() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = seed(&db, sample("0xowner")).await?;
        create_contribution(&db, pay(&c, "0xfan", 3.0, "tx-w1")).await?;
        create_contribution(&db, pay(&c, "0xfan", 4.0, "tx-w2")).await?;

        let listing = contributions_by_wallet(&db, "0xfan").await?;
        assert_eq!(listing.contributions.len(), 2);
        assert_eq!(listing.total_contributed, 7.0);
        assert_eq!(listing.contributions[0].campaign.as_ref().map(|c| c.campaign.id), Some(c.id));

        let empty = contributions_by_wallet(&db, "0xstranger").await?;
        assert!(empty.contributions.is_empty());
        assert_eq!(empty.total_contributed, 0.0);

        assert_eq!(addresses_by_campaign(&db, &c.id.to_string()).await?, vec!["0xfan".to_string()]);
        assert_eq!(all_campaign_contributions(&db).await?.len(), 2);
        assert!(all_event_contributions(&db).await?.is_empty());
        Ok(())
    }
}
