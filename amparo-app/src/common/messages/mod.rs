pub mod cross_domain;

use amparo_model::UserId;

use crate::common::task::Task;
use crate::domains::{
    auth, lifecycle, navigation::{self, Route}, profile, session,
};

/// Result of a domain update: follow-up work plus events for other domains.
#[derive(Debug)]
pub struct DomainUpdateResult {
    /// The task to execute (may produce more messages)
    pub task: Task<DomainMessage>,
    /// Events to broadcast to other domains immediately
    pub events: Vec<CrossDomainEvent>,
}

impl DomainUpdateResult {
    pub fn none() -> Self {
        Self::task(Task::none())
    }

    pub fn task(task: Task<DomainMessage>) -> Self {
        Self {
            task,
            events: Vec::new(),
        }
    }

    pub fn event(event: CrossDomainEvent) -> Self {
        Self::with_events(Task::none(), vec![event])
    }

    pub fn with_events(
        task: Task<DomainMessage>,
        events: Vec<CrossDomainEvent>,
    ) -> Self {
        Self { task, events }
    }

    pub fn add_event(mut self, event: CrossDomainEvent) -> Self {
        self.events.push(event);
        self
    }
}

/// The main domain message router
#[derive(Clone, Debug)]
pub enum DomainMessage {
    Session(session::SessionMessage),
    Auth(auth::AuthMessage),
    Navigation(navigation::NavigationMessage),
    Profile(profile::ProfileMessage),
    Lifecycle(lifecycle::LifecycleMessage),
    NoOp,
}

impl DomainMessage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Session(msg) => msg.name(),
            Self::Auth(msg) => msg.name(),
            Self::Navigation(msg) => msg.name(),
            Self::Profile(msg) => msg.name(),
            Self::Lifecycle(msg) => msg.name(),
            Self::NoOp => "NoOp",
        }
    }
}

impl From<session::SessionMessage> for DomainMessage {
    fn from(msg: session::SessionMessage) -> Self {
        DomainMessage::Session(msg)
    }
}

impl From<auth::AuthMessage> for DomainMessage {
    fn from(msg: auth::AuthMessage) -> Self {
        DomainMessage::Auth(msg)
    }
}

impl From<navigation::NavigationMessage> for DomainMessage {
    fn from(msg: navigation::NavigationMessage) -> Self {
        DomainMessage::Navigation(msg)
    }
}

impl From<profile::ProfileMessage> for DomainMessage {
    fn from(msg: profile::ProfileMessage) -> Self {
        DomainMessage::Profile(msg)
    }
}

impl From<lifecycle::LifecycleMessage> for DomainMessage {
    fn from(msg: lifecycle::LifecycleMessage) -> Self {
        DomainMessage::Lifecycle(msg)
    }
}

/// Events that need coordination across domains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CrossDomainEvent {
    /// The signed-in identity changed (sign-in, sign-out, account switch).
    SessionUserChanged {
        previous: Option<UserId>,
        current: Option<UserId>,
    },
    /// The visible route changed; screens mount and unmount accordingly.
    RouteChanged { from: Route, to: Route },
    /// Sign-out confirmed by the provider from account settings.
    UserSignedOut,
    /// A failure whose originating screen is gone; shown over the tabs.
    NoticeRaised { title: String, message: String },
}
