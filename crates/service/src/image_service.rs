use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::{campaign, campaign_image, validate};

use crate::errors::ServiceError;

/// `POST /upload-image` body. `img_id` is a storage blob id or URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewImage {
    pub campaign_id: String,
    pub img_id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Attach an uploaded image to an existing campaign.
pub async fn upload_image(db: &DatabaseConnection, input: NewImage) -> Result<campaign_image::Model, ServiceError> {
    validate::required("campaignId", &input.campaign_id)?;
    validate::required("imgId", &input.img_id)?;
    validate::required("type", &input.kind)?;

    let campaign = campaign::find_by_ref(db, &input.campaign_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("campaign"))?;
    let image = campaign_image::ActiveModel {
        id: Set(Uuid::new_v4()),
        campaign_id: Set(campaign.id),
        image_ref: Set(input.img_id.trim().to_string()),
        kind: Set(input.kind.trim().to_string()),
        is_cover: Set(false),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await?;
    info!(campaign_id = %campaign.id, image_id = %image.id, kind = %image.kind, "image_uploaded");
    Ok(image)
}
