use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use models::campaign::{self, CampaignStatus, RewardType};
use models::milestone::{self, MilestoneStatus};
use models::{campaign_image, contribution, roadmap_phase, story_section, team_member, tier, user, validate};

use crate::errors::ServiceError;
use crate::loaders;
use crate::pagination::Pagination;

/// Campaign creation input, including the nested content rows.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCampaign {
    pub creator_address: String,
    #[serde(default)]
    pub on_chain_object_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub short_description: Option<String>,
    pub category: String,
    pub goal_amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    pub duration_days: i32,
    #[serde(default)]
    pub reward_type: Option<String>,
    #[serde(default)]
    pub story_sections: Vec<NewStorySection>,
    #[serde(default)]
    pub roadmap_phases: Vec<NewRoadmapPhase>,
    #[serde(default)]
    pub team_members: Vec<NewTeamMember>,
    #[serde(default)]
    pub gallery_images: Vec<NewGalleryImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStorySection {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRoadmapPhase {
    pub title: String,
    pub timeline: String,
    #[serde(default)]
    pub description: String,
    pub state: String,
    #[serde(default)]
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTeamMember {
    pub name: String,
    pub role: String,
    #[serde(default = "empty_object")]
    pub contact_info: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGalleryImage {
    pub image_url: String,
    #[serde(default)]
    pub is_cover: bool,
}

fn empty_object() -> Value { Value::Object(Default::default()) }

#[derive(Debug, Clone, Serialize)]
pub struct CreatedCampaign {
    pub campaign_id: Uuid,
}

/// Listing row: campaign with its pictures and funding history.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignWithActivity {
    #[serde(flatten)]
    pub campaign: campaign::Model,
    pub images: Vec<campaign_image::Model>,
    pub contributions: Vec<contribution::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatorCampaign {
    #[serde(flatten)]
    pub campaign: campaign::Model,
    pub images: Vec<campaign_image::Model>,
    pub contributions: Vec<contribution::Model>,
    pub milestones: Vec<milestone::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VotingCampaign {
    #[serde(flatten)]
    pub campaign: campaign::Model,
    pub images: Vec<campaign_image::Model>,
    /// Earliest milestone currently in voting.
    pub milestone: milestone::Model,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignDetails {
    #[serde(flatten)]
    pub campaign: campaign::Model,
    pub images: Vec<campaign_image::Model>,
    pub contributions: Vec<contribution::Model>,
    pub milestones: Vec<milestone::Model>,
    pub story_sections: Vec<story_section::Model>,
    pub roadmap_phases: Vec<roadmap_phase::Model>,
    pub team_members: Vec<team_member::Model>,
    pub tiers: Vec<tier::Model>,
}

/// Check every field of a creation request before touching the database.
pub fn validate_new_campaign(input: &NewCampaign) -> Result<(RewardType, String), ServiceError> {
    validate::required("creator_address", &input.creator_address)?;
    validate::required("title", &input.title)?;
    validate::required("category", &input.category)?;
    validate::positive_amount("goal_amount", input.goal_amount)?;
    validate::days_after("duration_days", Utc::now(), input.duration_days as i64)?;
    let reward = match input.reward_type.as_deref() {
        Some(raw) => RewardType::parse(raw)?,
        None => RewardType::None,
    };
    let currency = match input.currency.as_deref().map(str::trim) {
        Some("") => return Err(ServiceError::validation("currency must not be empty")),
        Some(c) => c.to_ascii_uppercase(),
        None => "USD".to_string(),
    };
    if let Some(obj) = &input.on_chain_object_id {
        validate::required("on_chain_object_id", obj)?;
    }
    for s in &input.story_sections {
        validate::required("story_sections.title", &s.title)?;
        validate::required("story_sections.content", &s.content)?;
    }
    for p in &input.roadmap_phases {
        validate::required("roadmap_phases.title", &p.title)?;
        roadmap_phase::PhaseState::parse(&p.state)?;
    }
    for m in &input.team_members {
        validate::required("team_members.name", &m.name)?;
        validate::json_object("team_members.contact_info", &m.contact_info)?;
    }
    for g in &input.gallery_images {
        validate::required("gallery_images.image_url", &g.image_url)?;
    }
    Ok((reward, currency))
}

/// Create a campaign with its story, roadmap, team and gallery in one transaction.
///
/// The creator is looked up by wallet and created on first use.
#[instrument(skip(db, input), fields(creator = %input.creator_address, title = %input.title))]
pub async fn create_campaign(db: &DatabaseConnection, input: NewCampaign) -> Result<CreatedCampaign, ServiceError> {
    let (reward_type, currency) = validate_new_campaign(&input)?;
    let now = Utc::now();
    let end_date = validate::days_after("duration_days", now, input.duration_days as i64)?;

    let txn = db.begin().await?;
    let creator = user::find_or_create_by_wallet(&txn, input.creator_address.trim()).await?;

    if let Some(obj) = &input.on_chain_object_id {
        let taken = campaign::Entity::find()
            .filter(campaign::Column::OnChainObjectId.eq(obj.trim()))
            .one(&txn)
            .await?;
        if taken.is_some() {
            return Err(ServiceError::conflict(format!("campaign with object id {} already exists", obj.trim())));
        }
    }

    let campaign_id = Uuid::new_v4();
    campaign::ActiveModel {
        id: Set(campaign_id),
        creator_id: Set(creator.id),
        on_chain_object_id: Set(input.on_chain_object_id.as_deref().map(|s| s.trim().to_string())),
        title: Set(input.title.trim().to_string()),
        short_description: Set(input.short_description.clone()),
        category: Set(input.category.trim().to_string()),
        goal_amount: Set(input.goal_amount),
        current_amount: Set(0.0),
        currency: Set(currency),
        duration_days: Set(input.duration_days),
        end_date: Set(end_date.into()),
        reward_type: Set(reward_type),
        status: Set(CampaignStatus::Active),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    if !input.story_sections.is_empty() {
        let rows = input.story_sections.iter().enumerate().map(|(i, s)| story_section::ActiveModel {
            id: Set(Uuid::new_v4()),
            campaign_id: Set(campaign_id),
            title: Set(s.title.clone()),
            content: Set(s.content.clone()),
            display_order: Set(s.display_order.unwrap_or(i as i32)),
        });
        story_section::Entity::insert_many(rows).exec_without_returning(&txn).await?;
    }

    if !input.roadmap_phases.is_empty() {
        let mut rows = Vec::with_capacity(input.roadmap_phases.len());
        for (i, p) in input.roadmap_phases.iter().enumerate() {
            rows.push(roadmap_phase::ActiveModel {
                id: Set(Uuid::new_v4()),
                campaign_id: Set(campaign_id),
                title: Set(p.title.clone()),
                timeline: Set(p.timeline.clone()),
                description: Set(p.description.clone()),
                state: Set(roadmap_phase::PhaseState::parse(&p.state)?),
                display_order: Set(p.display_order.unwrap_or(i as i32)),
            });
        }
        roadmap_phase::Entity::insert_many(rows).exec_without_returning(&txn).await?;
    }

    if !input.team_members.is_empty() {
        let rows = input.team_members.iter().map(|m| team_member::ActiveModel {
            id: Set(Uuid::new_v4()),
            campaign_id: Set(campaign_id),
            name: Set(m.name.clone()),
            role: Set(m.role.clone()),
            contact_info: Set(m.contact_info.clone()),
        });
        team_member::Entity::insert_many(rows).exec_without_returning(&txn).await?;
    }

    if !input.gallery_images.is_empty() {
        let rows = input.gallery_images.iter().map(|g| campaign_image::ActiveModel {
            id: Set(Uuid::new_v4()),
            campaign_id: Set(campaign_id),
            image_ref: Set(g.image_url.clone()),
            kind: Set(campaign_image::KIND_GALLERY.to_string()),
            is_cover: Set(g.is_cover),
            created_at: Set(now.into()),
        });
        campaign_image::Entity::insert_many(rows).exec_without_returning(&txn).await?;
    }

    txn.commit().await?;
    info!(%campaign_id, creator_id = %creator.id, "campaign_created");
    Ok(CreatedCampaign { campaign_id })
}

/// Newest campaigns first, each with images and contributions.
pub async fn list_campaigns(db: &DatabaseConnection, page: Pagination) -> Result<Vec<CampaignWithActivity>, ServiceError> {
    let campaigns = campaign::Entity::find()
        .order_by_desc(campaign::Column::CreatedAt)
        .limit(page.limit)
        .offset(page.offset)
        .all(db)
        .await?;
    let ids: Vec<Uuid> = campaigns.iter().map(|c| c.id).collect();
    let (mut images, mut contributions) =
        tokio::try_join!(loaders::images_for(db, &ids), loaders::contributions_for(db, &ids))?;

    Ok(campaigns
        .into_iter()
        .map(|c| CampaignWithActivity {
            images: images.remove(&c.id).unwrap_or_default(),
            contributions: contributions.remove(&c.id).unwrap_or_default(),
            campaign: c,
        })
        .collect())
}

/// Campaigns created by a wallet. An unknown wallet has no campaigns.
pub async fn campaigns_by_creator(db: &DatabaseConnection, address: &str) -> Result<Vec<CreatorCampaign>, ServiceError> {
    validate::required("creator", address)?;
    let Some(creator) = user::find_by_wallet(db, address.trim()).await? else {
        return Ok(Vec::new());
    };
    let campaigns = campaign::Entity::find()
        .filter(campaign::Column::CreatorId.eq(creator.id))
        .order_by_desc(campaign::Column::CreatedAt)
        .all(db)
        .await?;
    let ids: Vec<Uuid> = campaigns.iter().map(|c| c.id).collect();
    let (mut images, mut contributions, mut milestones) = tokio::try_join!(
        loaders::images_for(db, &ids),
        loaders::contributions_for(db, &ids),
        loaders::milestones_for(db, &ids),
    )?;

    Ok(campaigns
        .into_iter()
        .map(|c| CreatorCampaign {
            images: images.remove(&c.id).unwrap_or_default(),
            contributions: contributions.remove(&c.id).unwrap_or_default(),
            milestones: milestones.remove(&c.id).unwrap_or_default(),
            campaign: c,
        })
        .collect())
}

/// Completed campaigns that currently have a milestone up for vote.
pub async fn voting_campaigns(db: &DatabaseConnection, page: Pagination) -> Result<Vec<VotingCampaign>, ServiceError> {
    let voting_ids: Vec<Uuid> = milestone::Entity::find()
        .select_only()
        .column(milestone::Column::CampaignId)
        .filter(milestone::Column::Status.eq(MilestoneStatus::InVoting))
        .distinct()
        .into_tuple()
        .all(db)
        .await?;
    if voting_ids.is_empty() {
        return Ok(Vec::new());
    }

    let campaigns = campaign::Entity::find()
        .filter(campaign::Column::Status.eq(CampaignStatus::Completed))
        .filter(campaign::Column::Id.is_in(voting_ids))
        .order_by_desc(campaign::Column::CreatedAt)
        .limit(page.limit)
        .offset(page.offset)
        .all(db)
        .await?;
    let ids: Vec<Uuid> = campaigns.iter().map(|c| c.id).collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let in_voting = milestone::Entity::find()
        .filter(milestone::Column::CampaignId.is_in(ids.clone()))
        .filter(milestone::Column::Status.eq(MilestoneStatus::InVoting))
        .order_by_asc(milestone::Column::CreatedAt);
    let (mut images, votes) = tokio::try_join!(loaders::images_for(db, &ids), in_voting.all(db))?;
    let mut votes = loaders::group_by(votes, |m| m.campaign_id);

    Ok(campaigns
        .into_iter()
        .filter_map(|c| {
            let milestone = votes.remove(&c.id)?.into_iter().next()?;
            Some(VotingCampaign { images: images.remove(&c.id).unwrap_or_default(), milestone, campaign: c })
        })
        .collect())
}

/// Full campaign page. `reference` is the campaign UUID or its on-chain object id.
#[instrument(skip(db))]
pub async fn campaign_details(db: &DatabaseConnection, reference: &str) -> Result<CampaignDetails, ServiceError> {
    validate::required("id", reference)?;
    let campaign = campaign::find_by_ref(db, reference)
        .await?
        .ok_or_else(|| ServiceError::not_found("campaign"))?;
    let id = campaign.id;

    let (images, contributions, milestones, story_sections, roadmap_phases, team_members, tiers) = tokio::try_join!(
        campaign_image::Entity::find()
            .filter(campaign_image::Column::CampaignId.eq(id))
            .order_by_asc(campaign_image::Column::CreatedAt)
            .all(db),
        contribution::Entity::find()
            .filter(contribution::Column::CampaignId.eq(id))
            .order_by_desc(contribution::Column::CreatedAt)
            .all(db),
        milestone::Entity::find()
            .filter(milestone::Column::CampaignId.eq(id))
            .order_by_asc(milestone::Column::CreatedAt)
            .all(db),
        story_section::Entity::find()
            .filter(story_section::Column::CampaignId.eq(id))
            .order_by_asc(story_section::Column::DisplayOrder)
            .all(db),
        roadmap_phase::Entity::find()
            .filter(roadmap_phase::Column::CampaignId.eq(id))
            .order_by_asc(roadmap_phase::Column::DisplayOrder)
            .all(db),
        team_member::Entity::find()
            .filter(team_member::Column::CampaignId.eq(id))
            .all(db),
        tier::Entity::find()
            .filter(tier::Column::CampaignId.eq(id))
            .order_by_asc(tier::Column::CreatedAt)
            .all(db),
    )?;

    Ok(CampaignDetails {
        campaign,
        images,
        contributions,
        milestones,
        story_sections,
        roadmap_phases,
        team_members,
        tiers,
    })
}
