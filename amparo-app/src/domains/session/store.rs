//! Process-wide session store.
//!
//! Holds a read-only copy of the provider's session plus the loading flag and
//! publishes every write through a `watch` channel. Only the session domain's
//! update handlers write to it.

use std::sync::Arc;

use amparo_model::{Session, SessionChange, UserId};
use thiserror::Error;
use tokio::sync::watch;

use crate::infra::services::{SessionSubscription, SubscriptionEvent};

/// What consumers see: the session (if any) and whether it is still being
/// resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session: Option<Session>,
    pub is_loading: bool,
}

impl SessionSnapshot {
    pub fn loading() -> Self {
        Self {
            session: None,
            is_loading: true,
        }
    }

    pub fn resolved(session: Option<Session>) -> Self {
        Self {
            session,
            is_loading: false,
        }
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.session.as_ref().map(Session::user_id)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session store already initialized")]
    AlreadyInitialized,

    #[error("session store was torn down")]
    TornDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Initialized,
    TornDown,
}

/// Marker for one session query. A query result only lands if no change
/// event was applied after the query was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket(u64);

#[derive(Debug)]
pub struct SessionStore {
    sender: Arc<watch::Sender<SessionSnapshot>>,
    receiver: watch::Receiver<SessionSnapshot>,
    subscription: Option<SessionSubscription>,
    lifecycle: Lifecycle,
    /// Bumped on every applied change event.
    generation: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(SessionSnapshot::loading());
        Self {
            sender: Arc::new(sender),
            receiver,
            subscription: None,
            lifecycle: Lifecycle::Idle,
            generation: 0,
        }
    }

    pub fn current_session(&self) -> Option<Session> {
        self.receiver.borrow().session.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.receiver.borrow().is_loading
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.receiver.borrow().clone()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.receiver.borrow().user_id()
    }

    /// Access the snapshot without cloning.
    pub fn with_snapshot<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SessionSnapshot) -> R,
    {
        f(&self.receiver.borrow())
    }

    /// Reactive binding for consumers outside the update loop.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.receiver.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle == Lifecycle::Initialized
    }

    /// Whether [`SessionStore::begin_initialize`] would be accepted.
    pub fn can_initialize(&self) -> Result<(), SessionError> {
        match self.lifecycle {
            Lifecycle::Idle => Ok(()),
            Lifecycle::Initialized => Err(SessionError::AlreadyInitialized),
            Lifecycle::TornDown => Err(SessionError::TornDown),
        }
    }

    /// Attach the provider subscription and enter the loading state.
    ///
    /// The subscription is attached before the initial query is issued so no
    /// change emitted while the query is in flight is missed. Returns the
    /// ticket the query result must be resolved with.
    pub fn begin_initialize(
        &mut self,
        subscription: SessionSubscription,
    ) -> Result<QueryTicket, SessionError> {
        self.can_initialize()?;
        self.lifecycle = Lifecycle::Initialized;
        self.subscription = Some(subscription);
        self.publish(|snapshot| snapshot.is_loading = true);
        Ok(self.ticket())
    }

    /// Ticket for a re-query (e.g. after the subscription lagged).
    pub fn ticket(&self) -> QueryTicket {
        QueryTicket(self.generation)
    }

    /// Land the result of a session query.
    ///
    /// Always clears the loading flag. The queried session is discarded if a
    /// change event was applied after `ticket` was issued, since that event
    /// is newer. Returns true if the stored session changed.
    pub fn resolve_query(
        &mut self,
        ticket: QueryTicket,
        session: Option<Session>,
    ) -> bool {
        let fresh = ticket.0 == self.generation;
        if !fresh {
            log::debug!(
                "[Session] Discarding stale session query result (ticket {}, generation {})",
                ticket.0,
                self.generation
            );
        }
        let before = self.user_id();
        let mut changed = false;
        self.publish(|snapshot| {
            snapshot.is_loading = false;
            if fresh && snapshot.session != session {
                snapshot.session = session;
                changed = true;
            }
        });
        if changed {
            log::info!(
                "[Session] Resolved session: {:?} -> {:?}",
                before,
                self.user_id()
            );
        }
        changed
    }

    /// Overwrite the stored session with a provider change event.
    ///
    /// Last writer wins: no buffering, no coalescing.
    pub fn apply_change(&mut self, change: SessionChange) {
        self.generation += 1;
        log::info!(
            "[Session] {} (user: {:?})",
            change.event,
            change.session.as_ref().map(Session::user_id)
        );
        self.publish(|snapshot| {
            snapshot.session = change.session;
        });
    }

    /// Poll the subscription for an already-delivered event.
    pub fn try_next_event(&mut self) -> Option<SubscriptionEvent> {
        self.subscription.as_mut()?.try_next()
    }

    /// Wait for the next event. Pending forever without a subscription.
    pub async fn next_event(&mut self) -> SubscriptionEvent {
        match self.subscription.as_mut() {
            Some(subscription) => subscription.next().await,
            None => std::future::pending().await,
        }
    }

    pub fn has_subscription(&self) -> bool {
        self.subscription.is_some()
    }

    /// Drop the provider subscription after it closed on the provider side.
    pub fn detach(&mut self) {
        if self.subscription.take().is_some() {
            log::warn!("[Session] Provider closed the session change stream");
        }
    }

    /// Release the provider subscription. Idempotent.
    pub fn teardown(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        self.lifecycle = Lifecycle::TornDown;
        if self.subscription.take().is_some() {
            log::debug!("[Session] Unsubscribed from provider session changes");
        }
    }

    fn publish(&self, f: impl FnOnce(&mut SessionSnapshot)) {
        // send_modify notifies even without receivers
        self.sender.send_modify(f);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amparo_model::{AuthUser, SessionChange};
    use tokio::sync::broadcast;
    use uuid::Uuid;

    fn session(tag: &str) -> Session {
        Session {
            access_token: format!("access-{tag}"),
            refresh_token: format!("refresh-{tag}"),
            token_type: "bearer".into(),
            expires_in: 3600,
            expires_at: None,
            user: AuthUser {
                id: UserId(Uuid::new_v4()),
                email: Some(format!("{tag}@example.com")),
            },
        }
    }

    fn subscription() -> (broadcast::Sender<SessionChange>, SessionSubscription) {
        let (tx, rx) = broadcast::channel(8);
        (tx, SessionSubscription::new(rx))
    }

    #[test]
    fn starts_loading_and_resolves_once_queried() {
        let mut store = SessionStore::new();
        assert!(store.is_loading());

        let (_tx, sub) = subscription();
        let ticket = store.begin_initialize(sub).expect("first init");
        let restored = session("ana");
        assert!(store.resolve_query(ticket, Some(restored.clone())));

        assert!(!store.is_loading());
        assert_eq!(store.current_session(), Some(restored));
    }

    #[test]
    fn second_initialize_is_rejected() {
        let mut store = SessionStore::new();
        let (_tx, sub) = subscription();
        store.begin_initialize(sub).expect("first init");
        let (_tx2, sub2) = subscription();
        assert_eq!(
            store.begin_initialize(sub2),
            Err(SessionError::AlreadyInitialized)
        );
    }

    #[test]
    fn change_during_query_wins_over_stale_result() {
        let mut store = SessionStore::new();
        let (_tx, sub) = subscription();
        let ticket = store.begin_initialize(sub).expect("init");

        let signed_in = session("new");
        store.apply_change(SessionChange::signed_in(signed_in.clone()));
        assert!(!store.resolve_query(ticket, None));

        assert!(!store.is_loading());
        assert_eq!(store.current_session(), Some(signed_in));
    }

    #[test]
    fn watchers_see_every_write() {
        let mut store = SessionStore::new();
        let mut watcher = store.subscribe();
        let (_tx, sub) = subscription();
        let ticket = store.begin_initialize(sub).expect("init");
        store.resolve_query(ticket, None);

        assert!(watcher.has_changed().unwrap_or(false));
        assert_eq!(*watcher.borrow_and_update(), SessionSnapshot::resolved(None));

        store.apply_change(SessionChange::signed_in(session("ana")));
        assert!(watcher.borrow_and_update().has_session());
    }

    #[test]
    fn teardown_releases_subscription_and_blocks_reinit() {
        let mut store = SessionStore::new();
        let (tx, sub) = subscription();
        store.begin_initialize(sub).expect("init");
        assert_eq!(tx.receiver_count(), 1);

        store.teardown();
        store.teardown();
        assert_eq!(tx.receiver_count(), 0);
        assert!(store.try_next_event().is_none());

        let (_tx2, sub2) = subscription();
        assert_eq!(store.begin_initialize(sub2), Err(SessionError::TornDown));
    }

    #[test]
    fn drop_releases_subscription() {
        let (tx, sub) = subscription();
        {
            let mut store = SessionStore::new();
            store.begin_initialize(sub).expect("init");
            assert_eq!(tx.receiver_count(), 1);
        }
        assert_eq!(tx.receiver_count(), 0);
    }

    #[test]
    fn delivered_events_are_polled_in_order() {
        let mut store = SessionStore::new();
        let (tx, sub) = subscription();
        store.begin_initialize(sub).expect("init");

        let first = session("a");
        tx.send(SessionChange::signed_in(first.clone())).expect("send");
        tx.send(SessionChange::signed_out()).expect("send");

        assert_eq!(
            store.try_next_event(),
            Some(SubscriptionEvent::Change(SessionChange::signed_in(first)))
        );
        assert_eq!(
            store.try_next_event(),
            Some(SubscriptionEvent::Change(SessionChange::signed_out()))
        );
        assert_eq!(store.try_next_event(), None);
    }
}
