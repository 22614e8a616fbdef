use sea_orm::{entity::prelude::*, sea_query::OnConflict, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[default]
    #[sea_orm(string_value = "user")]
    User,
}

impl Role {
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        validate::one_of("role", raw, &["admin", "user"])?;
        Ok(if raw.trim().eq_ignore_ascii_case("admin") { Role::Admin } else { Role::User })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub wallet_address: String,
    pub username: Option<String>,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub role: Role,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_by_wallet<C: ConnectionTrait>(db: &C, wallet: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::WalletAddress.eq(wallet)).one(db).await?)
}

/// Look up a user by wallet, inserting a bare `user` row when the wallet is new.
///
/// The insert is `ON CONFLICT DO NOTHING`, so two callers racing on the same
/// wallet both end up reading the single stored row.
pub async fn find_or_create_by_wallet<C: ConnectionTrait>(db: &C, wallet: &str) -> Result<Model, ModelError> {
    validate::required("wallet_address", wallet)?;
    if let Some(found) = find_by_wallet(db, wallet).await? {
        return Ok(found);
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        wallet_address: Set(wallet.to_string()),
        username: Set(None),
        email: Set(None),
        role: Set(Role::User),
        bio: Set(None),
        avatar_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Entity::insert(am)
        .on_conflict(OnConflict::column(Column::WalletAddress).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    find_by_wallet(db, wallet)
        .await?
        .ok_or_else(|| ModelError::Db(format!("user for wallet {wallet} vanished after insert")))
}
