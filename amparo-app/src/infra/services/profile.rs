//! Profile record storage, keyed by user id.

use amparo_model::{Profile, ProfileUpdate, ProfileUpsert, UserId};
use async_trait::async_trait;

use super::error::ProviderResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Insert or merge the row for `profile.id`.
    async fn upsert_profile(&self, profile: ProfileUpsert) -> ProviderResult<()>;

    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> ProviderResult<()>;

    /// `Ok(None)` when no row exists yet.
    async fn fetch_profile(&self, id: UserId) -> ProviderResult<Option<Profile>>;
}
