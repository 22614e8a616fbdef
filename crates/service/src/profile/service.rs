use std::sync::Arc;

use tracing::{info, instrument};

use models::user::Role;
use models::validate;

use super::domain::{NewProfile, Profile, ProfileChanges, ProfileDraft, ProfilePatch, ProfileStats};
use super::repository::ProfileRepository;
use crate::errors::ServiceError;

/// Trim an optional text field; blank becomes `None`.
fn clean(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Profile business service independent of web framework
pub struct ProfileService<R: ProfileRepository> {
    repo: Arc<R>,
}

impl<R: ProfileRepository> ProfileService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Register a profile for a wallet.
    ///
    /// # Examples
    /// ```
    /// use service::profile::{ProfileService, repository::mock::MockProfileRepository};
    /// use service::profile::domain::NewProfile;
    /// use std::sync::Arc;
    /// let svc = ProfileService::new(Arc::new(MockProfileRepository::default()));
    /// let input = NewProfile { wallet_address: "0xabc".into(), email: Some("a@example.com".into()), ..Default::default() };
    /// let profile = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(profile.wallet_address, "0xabc");
    /// ```
    #[instrument(skip(self, input), fields(wallet = %input.wallet_address))]
    pub async fn create(&self, input: NewProfile) -> Result<Profile, ServiceError> {
        validate::required("walletAddress", &input.wallet_address)?;
        let email = clean(input.email);
        if let Some(e) = &email {
            validate::email(e)?;
        }
        let avatar_url = clean(input.avatar_url);
        if let Some(url) = &avatar_url {
            validate::http_url("avatarUrl", url)?;
        }
        let role = match input.role.as_deref() {
            Some(r) => Role::parse(r)?,
            None => Role::User,
        };
        let wallet = input.wallet_address.trim().to_string();

        if self.repo.find_by_wallet(&wallet).await?.is_some() {
            return Err(ServiceError::conflict("a profile with this wallet address already exists"));
        }
        if let Some(e) = &email {
            if self.repo.find_by_email(e).await?.is_some() {
                return Err(ServiceError::conflict("a profile with this email already exists"));
            }
        }

        let profile = self
            .repo
            .create(ProfileDraft {
                wallet_address: wallet,
                username: clean(input.username),
                email,
                role,
                bio: input.bio,
                avatar_url,
            })
            .await?;
        info!(profile_id = %profile.id, "profile_created");
        Ok(profile)
    }

    pub async fn by_wallet(&self, wallet: &str) -> Result<Profile, ServiceError> {
        validate::required("address", wallet)?;
        self.repo
            .find_by_wallet(wallet.trim())
            .await?
            .ok_or_else(|| ServiceError::not_found("profile"))
    }

    pub async fn by_email(&self, email: &str) -> Result<Profile, ServiceError> {
        validate::required("email", email)?;
        self.repo
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| ServiceError::not_found("profile"))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, wallet: &str, patch: ProfilePatch) -> Result<Profile, ServiceError> {
        validate::required("address", wallet)?;
        let wallet = wallet.trim();
        let email = clean(patch.email);
        if let Some(e) = &email {
            validate::email(e)?;
            if let Some(other) = self.repo.find_by_email(e).await? {
                if other.wallet_address != wallet {
                    return Err(ServiceError::conflict("a profile with this email already exists"));
                }
            }
        }
        let avatar_url = clean(patch.avatar_url);
        if let Some(url) = &avatar_url {
            validate::http_url("avatarUrl", url)?;
        }
        let role = patch.role.as_deref().map(Role::parse).transpose()?;

        let changes = ProfileChanges { username: clean(patch.username), email, role, bio: patch.bio, avatar_url };
        let updated = self
            .repo
            .update(wallet, changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("profile"))?;
        info!(profile_id = %updated.id, "profile_updated");
        Ok(updated)
    }

    /// Activity summary for a wallet. Unseen wallets report zeroes.
    pub async fn my_profile(&self, wallet: &str) -> Result<ProfileStats, ServiceError> {
        validate::required("address", wallet)?;
        let wallet = wallet.trim();
        let activity = self.repo.activity(wallet).await?;
        Ok(ProfileStats {
            address: wallet.to_string(),
            total_campaigns_created: activity.campaigns_created,
            total_contributions: activity.contributions,
            total_contribution_amount: activity.contribution_amount,
        })
    }
}
