//! PostgREST access to the `profiles` table.

use amparo_model::{Profile, ProfileUpdate, ProfileUpsert, UserId};
use async_trait::async_trait;

use crate::infra::services::{ProfileRepository, ProviderResult};

use super::client::SupabaseClient;

const PROFILES: &str = "rest/v1/profiles";
const PROFILE_COLUMNS: &str = "id,name,last_name,phone_number,updated_at";

fn id_filter(id: UserId) -> String {
    format!("eq.{id}")
}

#[async_trait]
impl ProfileRepository for SupabaseClient {
    async fn upsert_profile(&self, profile: ProfileUpsert) -> ProviderResult<()> {
        let url = self.endpoint(PROFILES)?;
        let request = self
            .authorize(self.inner.http.post(url))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&profile);
        self.send(request).await?;
        log::debug!("[Supabase] Upserted profile {}", profile.id);
        Ok(())
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> ProviderResult<()> {
        let mut url = self.endpoint(PROFILES)?;
        url.query_pairs_mut().append_pair("id", &id_filter(id));
        let request = self
            .authorize(self.inner.http.patch(url))
            .header("Prefer", "return=minimal")
            .json(&update);
        self.send(request).await?;
        log::debug!("[Supabase] Updated profile {id}");
        Ok(())
    }

    async fn fetch_profile(&self, id: UserId) -> ProviderResult<Option<Profile>> {
        let mut url = self.endpoint(PROFILES)?;
        url.query_pairs_mut()
            .append_pair("select", PROFILE_COLUMNS)
            .append_pair("id", &id_filter(id));
        let request = self.authorize(self.inner.http.get(url));
        let response = self.send(request).await?;
        let rows: Vec<Profile> = Self::json(response).await?;
        Ok(rows.into_iter().next())
    }
}
