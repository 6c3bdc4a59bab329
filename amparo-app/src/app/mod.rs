//! Headless runtime.
//!
//! Owns the [`State`], feeds messages through [`update`] and drives the
//! futures of every returned [`Task`] on the tokio runtime. Session change
//! events are polled straight from the store's provider subscription.

use std::collections::VecDeque;

use futures::future::BoxFuture;
use tokio::task::{JoinError, JoinSet};

use crate::common::Task;
use crate::common::messages::DomainMessage;
use crate::domains::lifecycle::{AppLifecycle, LifecycleMessage};
use crate::domains::session::SessionMessage;
use crate::infra::services::SubscriptionEvent;
use crate::state::State;
use crate::update;

pub mod bootstrap;

pub use bootstrap::AppConfig;

enum Wake {
    Task(Option<Result<DomainMessage, JoinError>>),
    Session(SubscriptionEvent),
}

pub struct App {
    state: State,
    queue: VecDeque<DomainMessage>,
    /// Futures not yet handed to the runtime.
    pending: Vec<BoxFuture<'static, DomainMessage>>,
    tasks: JoinSet<DomainMessage>,
}

impl App {
    /// Build the app. Nothing runs until [`App::run_until_idle`].
    pub fn boot(config: AppConfig) -> Self {
        let (state, task) = bootstrap::runtime_boot(config);
        let mut app = Self {
            state,
            queue: VecDeque::new(),
            pending: Vec::new(),
            tasks: JoinSet::new(),
        };
        app.spawn(task);
        app
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Queue a message for the next run.
    pub fn send(&mut self, message: impl Into<DomainMessage>) {
        self.queue.push_back(message.into());
    }

    /// Apply one message now. Its follow-up work runs on the next
    /// [`App::run_until_idle`].
    pub fn dispatch(&mut self, message: impl Into<DomainMessage>) {
        let task = update::update(&mut self.state, message.into());
        self.spawn(task);
    }

    fn spawn(&mut self, task: Task<DomainMessage>) {
        self.pending.extend(task.into_futures());
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len() + self.pending.len()
    }

    /// Process messages, session events and task completions until nothing
    /// is queued and no task is in flight.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn run_until_idle(&mut self) {
        loop {
            // Provider facts first, so queued completions see the newest
            // session.
            if let Some(event) = self.state.domains.session.store.try_next_event() {
                self.dispatch(session_message(event));
                continue;
            }
            if let Some(message) = self.queue.pop_front() {
                self.dispatch(message);
                continue;
            }
            for future in self.pending.drain(..) {
                self.tasks.spawn(future);
            }
            if let Some(joined) = self.tasks.try_join_next() {
                self.on_joined(joined);
                continue;
            }
            if self.tasks.is_empty() {
                break;
            }

            let tasks = &mut self.tasks;
            let store = &mut self.state.domains.session.store;
            let wake = tokio::select! {
                joined = tasks.join_next() => Wake::Task(joined),
                event = store.next_event() => Wake::Session(event),
            };
            match wake {
                Wake::Task(Some(joined)) => self.on_joined(joined),
                Wake::Task(None) => {}
                Wake::Session(event) => self.dispatch(session_message(event)),
            }
        }
    }

    fn on_joined(&mut self, joined: Result<DomainMessage, JoinError>) {
        match joined {
            Ok(message) => self.queue.push_back(message),
            Err(err) => log::error!("[App] Task failed: {err}"),
        }
    }

    /// Stop background refresh, release the session subscription and abort
    /// whatever is still in flight.
    pub fn shutdown(&mut self) {
        self.dispatch(LifecycleMessage::Changed(AppLifecycle::Background));
        self.dispatch(SessionMessage::Teardown);
        self.pending.clear();
        self.queue.clear();
        self.tasks.abort_all();
        log::debug!("[App] Shut down");
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state)
            .field("queued", &self.queue.len())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

fn session_message(event: SubscriptionEvent) -> DomainMessage {
    DomainMessage::Session(match event {
        SubscriptionEvent::Change(change) => SessionMessage::Changed(change),
        SubscriptionEvent::Lagged(missed) => SessionMessage::Lagged(missed),
        SubscriptionEvent::Closed => SessionMessage::StreamClosed,
    })
}
