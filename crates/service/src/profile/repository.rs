use async_trait::async_trait;

use super::domain::{Profile, ProfileActivity, ProfileChanges, ProfileDraft};
use crate::errors::ServiceError;

/// Repository abstraction for profile persistence.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_wallet(&self, wallet: &str) -> Result<Option<Profile>, ServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, ServiceError>;
    async fn create(&self, draft: ProfileDraft) -> Result<Profile, ServiceError>;
    /// `None` when no profile exists for the wallet.
    async fn update(&self, wallet: &str, changes: ProfileChanges) -> Result<Option<Profile>, ServiceError>;
    /// Zeroes for a wallet that has never been seen.
    async fn activity(&self, wallet: &str) -> Result<ProfileActivity, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    pub struct MockProfileRepository {
        profiles: Mutex<HashMap<String, Profile>>, // key: wallet address
        activity: Mutex<HashMap<String, ProfileActivity>>,
    }

    impl MockProfileRepository {
        /// Seed activity numbers for a wallet.
        pub fn with_activity(self, wallet: &str, activity: ProfileActivity) -> Self {
            self.activity.lock().unwrap().insert(wallet.to_string(), activity);
            self
        }
    }

    #[async_trait]
    impl ProfileRepository for MockProfileRepository {
        async fn find_by_wallet(&self, wallet: &str) -> Result<Option<Profile>, ServiceError> {
            Ok(self.profiles.lock().unwrap().get(wallet).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, ServiceError> {
            let profiles = self.profiles.lock().unwrap();
            Ok(profiles.values().find(|p| p.email.as_deref() == Some(email)).cloned())
        }

        async fn create(&self, draft: ProfileDraft) -> Result<Profile, ServiceError> {
            let mut profiles = self.profiles.lock().unwrap();
            if profiles.contains_key(&draft.wallet_address) {
                return Err(ServiceError::conflict("wallet already registered"));
            }
            let now = chrono::Utc::now().into();
            let profile = Profile {
                id: Uuid::new_v4(),
                wallet_address: draft.wallet_address.clone(),
                username: draft.username,
                email: draft.email,
                role: draft.role,
                bio: draft.bio,
                avatar_url: draft.avatar_url,
                created_at: now,
                updated_at: now,
            };
            profiles.insert(draft.wallet_address, profile.clone());
            Ok(profile)
        }

        async fn update(&self, wallet: &str, changes: ProfileChanges) -> Result<Option<Profile>, ServiceError> {
            let mut profiles = self.profiles.lock().unwrap();
            let Some(p) = profiles.get_mut(wallet) else { return Ok(None) };
            if changes.username.is_some() { p.username = changes.username; }
            if changes.email.is_some() { p.email = changes.email; }
            if let Some(role) = changes.role { p.role = role; }
            if changes.bio.is_some() { p.bio = changes.bio; }
            if changes.avatar_url.is_some() { p.avatar_url = changes.avatar_url; }
            p.updated_at = chrono::Utc::now().into();
            Ok(Some(p.clone()))
        }

        async fn activity(&self, wallet: &str) -> Result<ProfileActivity, ServiceError> {
            Ok(self.activity.lock().unwrap().get(wallet).copied().unwrap_or_default())
        }
    }
}
