//! Background token refresh.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::client::{Inner, SupabaseClient};

pub(super) const DEFAULT_TICK: Duration = Duration::from_secs(30);

/// Tick until stopped or the client is dropped, refreshing whenever the
/// token is within the refresh margin. `None` outside a tokio runtime.
pub(super) fn spawn(client: Weak<Inner>, tick: Duration) -> Option<JoinHandle<()>> {
    let handle = tokio::runtime::Handle::try_current().ok()?;
    Some(handle.spawn(async move {
        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let Some(inner) = client.upgrade() else {
                break;
            };
            let client = SupabaseClient::from_inner(inner);
            if let Err(err) = client.refresh_if_due().await {
                log::warn!("[Supabase] Auto-refresh failed, retrying next tick: {err}");
            }
        }
    }))
}
