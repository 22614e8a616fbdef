//! Batched child loaders.
//!
//! A page of parents costs one `IN (...)` query per child kind; rows are
//! grouped in memory by parent id.

use std::collections::HashMap;
use std::hash::Hash;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use models::{campaign_image, contribution, milestone};

pub(crate) fn group_by<K, V>(rows: Vec<V>, key: impl Fn(&V) -> K) -> HashMap<K, Vec<V>>
where
    K: Eq + Hash,
{
    let mut out: HashMap<K, Vec<V>> = HashMap::new();
    for row in rows {
        out.entry(key(&row)).or_default().push(row);
    }
    out
}

pub(crate) async fn images_for<C: ConnectionTrait>(
    db: &C,
    campaign_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<campaign_image::Model>>, DbErr> {
    if campaign_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = campaign_image::Entity::find()
        .filter(campaign_image::Column::CampaignId.is_in(campaign_ids.to_vec()))
        .order_by_asc(campaign_image::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(group_by(rows, |r| r.campaign_id))
}

pub(crate) async fn contributions_for<C: ConnectionTrait>(
    db: &C,
    campaign_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<contribution::Model>>, DbErr> {
    if campaign_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = contribution::Entity::find()
        .filter(contribution::Column::CampaignId.is_in(campaign_ids.to_vec()))
        .order_by_desc(contribution::Column::CreatedAt)
        .all(db)
        .await?;
    // Filtered on campaign_id, so the key is always present.
    Ok(group_by(rows, |r| r.campaign_id.unwrap_or_default()))
}

pub(crate) async fn milestones_for<C: ConnectionTrait>(
    db: &C,
    campaign_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<milestone::Model>>, DbErr> {
    if campaign_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = milestone::Entity::find()
        .filter(milestone::Column::CampaignId.is_in(campaign_ids.to_vec()))
        .order_by_asc(milestone::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(group_by(rows, |r| r.campaign_id))
}

/// Cover image if one is flagged, otherwise the oldest image.
pub(crate) fn cover_of(images: &[campaign_image::Model]) -> Option<campaign_image::Model> {
    images
        .iter()
        .find(|i| i.is_cover)
        .or_else(|| images.first())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::group_by;

    #[test]
    fn group_by_keeps_input_order_within_groups() {
        let grouped = group_by(vec![(1, "a"), (2, "b"), (1, "c")], |r| r.0);
        assert_eq!(grouped[&1], vec![(1, "a"), (1, "c")]);
        assert_eq!(grouped[&2], vec![(2, "b")]);
    }
}
