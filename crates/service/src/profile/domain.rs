use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::user::{self, Role};

/// Public view of a user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub wallet_address: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub updated_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<user::Model> for Profile {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            wallet_address: u.wallet_address,
            username: u.username,
            email: u.email,
            role: u.role,
            bio: u.bio,
            avatar_url: u.avatar_url,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// `POST /profile` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    pub wallet_address: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// `PUT /profile/wallet/:address` body; absent fields stay as they are.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Validated creation record handed to the repository.
#[derive(Debug, Clone)]
pub struct ProfileDraft {
    pub wallet_address: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Validated partial update handed to the repository.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Aggregate activity of a wallet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProfileActivity {
    pub campaigns_created: u64,
    pub contributions: u64,
    pub contribution_amount: f64,
}

/// `GET /profile/me` payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileStats {
    pub address: String,
    pub total_campaigns_created: u64,
    pub total_contributions: u64,
    pub total_contribution_amount: f64,
}
