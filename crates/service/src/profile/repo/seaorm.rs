use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::profile::domain::{Profile, ProfileActivity, ProfileChanges, ProfileDraft};
use crate::profile::repository::ProfileRepository;
use models::{campaign, contribution, user};

pub struct SeaOrmProfileRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl ProfileRepository for SeaOrmProfileRepository {
    async fn find_by_wallet(&self, wallet: &str) -> Result<Option<Profile>, ServiceError> {
        Ok(user::find_by_wallet(&self.db, wallet).await?.map(Profile::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, ServiceError> {
        let res = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(res.map(Profile::from))
    }

    async fn create(&self, draft: ProfileDraft) -> Result<Profile, ServiceError> {
        let now = Utc::now().into();
        let created = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            wallet_address: Set(draft.wallet_address),
            username: Set(draft.username),
            email: Set(draft.email),
            role: Set(draft.role),
            bio: Set(draft.bio),
            avatar_url: Set(draft.avatar_url),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(created.into())
    }

    async fn update(&self, wallet: &str, changes: ProfileChanges) -> Result<Option<Profile>, ServiceError> {
        let Some(found) = user::find_by_wallet(&self.db, wallet).await? else { return Ok(None) };
        let mut am: user::ActiveModel = found.into();
        if let Some(v) = changes.username { am.username = Set(Some(v)); }
        if let Some(v) = changes.email { am.email = Set(Some(v)); }
        if let Some(v) = changes.role { am.role = Set(v); }
        if let Some(v) = changes.bio { am.bio = Set(Some(v)); }
        if let Some(v) = changes.avatar_url { am.avatar_url = Set(Some(v)); }
        am.updated_at = Set(Utc::now().into());
        Ok(Some(am.update(&self.db).await?.into()))
    }

    async fn activity(&self, wallet: &str) -> Result<ProfileActivity, ServiceError> {
        let Some(u) = user::find_by_wallet(&self.db, wallet).await? else {
            return Ok(ProfileActivity::default());
        };
        let campaigns_created = campaign::Entity::find()
            .filter(campaign::Column::CreatorId.eq(u.id))
            .count(&self.db)
            .await?;
        let contributions = contribution::Entity::find()
            .filter(contribution::Column::UserId.eq(u.id))
            .count(&self.db)
            .await?;
        let amount: Option<Option<f64>> = contribution::Entity::find()
            .select_only()
            .column_as(contribution::Column::Amount.sum(), "total")
            .filter(contribution::Column::UserId.eq(u.id))
            .into_tuple()
            .one(&self.db)
            .await?;
        Ok(ProfileActivity {
            campaigns_created,
            contributions,
            contribution_amount: amount.flatten().unwrap_or(0.0),
        })
    }
}
