use std::sync::Arc;

use amparo_config::Config;
use anyhow::Context;

use crate::common::Task;
use crate::common::messages::DomainMessage;
use crate::domains::lifecycle::{AppLifecycle, LifecycleMessage};
use crate::domains::session::SessionMessage;
use crate::infra::services::{AuthProvider, ProfileRepository, Services};
use crate::infra::supabase::SupabaseClient;
use crate::state::{AppSettings, State};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub settings: AppSettings,
    pub services: Services,
}

impl AppConfig {
    /// Wire the Supabase adapter from loaded configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = SupabaseClient::from_config(config)
            .context("failed to build Supabase client")?;
        let client = Arc::new(client);
        let auth: Arc<dyn AuthProvider> = client.clone();
        let profiles: Arc<dyn ProfileRepository> = client;
        Ok(Self {
            settings: AppSettings::from(config),
            services: Services::new(auth, profiles),
        })
    }

    /// Use caller-provided services, e.g. the in-memory stubs.
    pub fn with_services(services: Services, settings: AppSettings) -> Self {
        Self { settings, services }
    }
}

/// Initial state plus the startup work: subscribe to the provider and
/// resolve the persisted session, and report the app as foregrounded.
pub fn runtime_boot(config: AppConfig) -> (State, Task<DomainMessage>) {
    let state = State::new(config.services, config.settings);
    let task = Task::batch([
        Task::done(DomainMessage::Session(SessionMessage::Initialize)),
        Task::done(DomainMessage::Lifecycle(LifecycleMessage::Changed(
            AppLifecycle::Foreground,
        ))),
    ]);
    (state, task)
}
