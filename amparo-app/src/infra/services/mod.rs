// Service contracts the domains depend on. Concrete adapters live in
// `infra::supabase`; in-memory doubles in `infra::testing`.

use std::sync::Arc;

pub mod auth;
pub mod error;
pub mod profile;

pub use auth::{
    AuthProvider, Credentials, ResetPasswordOptions, SessionSubscription,
    SubscriptionEvent,
};
pub use error::{ProviderError, ProviderResult};
pub use profile::ProfileRepository;

/// Trait-object handles to every external collaborator.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthProvider>,
    pub profiles: Arc<dyn ProfileRepository>,
}

impl Services {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self { auth, profiles }
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("auth", &"AuthProvider(..)")
            .field("profiles", &"ProfileRepository(..)")
            .finish()
    }
}
