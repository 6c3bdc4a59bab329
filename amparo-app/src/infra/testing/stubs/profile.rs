use std::collections::HashMap;
use std::sync::Arc;

use amparo_model::{Profile, ProfileUpdate, ProfileUpsert, UserId};
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::infra::services::{ProfileRepository, ProviderError, ProviderResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileCalls {
    pub upsert: usize,
    pub update: usize,
    pub fetch: usize,
}

#[derive(Debug, Default)]
struct InnerProfileState {
    rows: HashMap<UserId, Profile>,
    upsert_error: Option<ProviderError>,
    update_error: Option<ProviderError>,
    fetch_error: Option<ProviderError>,
    calls: ProfileCalls,
}

/// In-memory `profiles` table.
#[derive(Debug, Clone, Default)]
pub struct StubProfileRepository {
    inner: Arc<RwLock<InnerProfileState>>,
}

impl StubProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, profile: Profile) -> Self {
        self.inner.write().rows.insert(profile.id, profile);
        self
    }

    pub fn profile(&self, id: UserId) -> Option<Profile> {
        self.inner.read().rows.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().rows.is_empty()
    }

    pub fn fail_upsert(&self, error: Option<ProviderError>) {
        self.inner.write().upsert_error = error;
    }

    pub fn fail_update(&self, error: Option<ProviderError>) {
        self.inner.write().update_error = error;
    }

    pub fn fail_fetch(&self, error: Option<ProviderError>) {
        self.inner.write().fetch_error = error;
    }

    pub fn calls(&self) -> ProfileCalls {
        self.inner.read().calls
    }
}

#[async_trait]
impl ProfileRepository for StubProfileRepository {
    async fn upsert_profile(&self, profile: ProfileUpsert) -> ProviderResult<()> {
        let mut inner = self.inner.write();
        inner.calls.upsert += 1;
        if let Some(err) = inner.upsert_error.clone() {
            return Err(err);
        }
        let row = inner
            .rows
            .entry(profile.id)
            .or_insert_with(|| Profile::empty(profile.id));
        row.name = Some(profile.name);
        row.last_name = Some(profile.last_name);
        row.phone_number = profile.phone_number;
        row.updated_at = Some(profile.updated_at);
        Ok(())
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> ProviderResult<()> {
        let mut inner = self.inner.write();
        inner.calls.update += 1;
        if let Some(err) = inner.update_error.clone() {
            return Err(err);
        }
        // PATCH on a missing row matches nothing and still succeeds.
        if let Some(row) = inner.rows.get_mut(&id) {
            row.name = Some(update.name);
            row.last_name = Some(update.last_name);
            row.phone_number = update.phone_number;
            row.updated_at = Some(update.updated_at);
        }
        Ok(())
    }

    async fn fetch_profile(&self, id: UserId) -> ProviderResult<Option<Profile>> {
        let mut inner = self.inner.write();
        inner.calls.fetch += 1;
        match inner.fetch_error.clone() {
            Some(err) => Err(err),
            None => Ok(inner.rows.get(&id).cloned()),
        }
    }
}
