use amparo_model::{Session, SessionChange};

use crate::infra::services::ProviderError;

use super::store::QueryTicket;

#[derive(Clone, Debug)]
pub enum SessionMessage {
    /// Subscribe to the provider and query the persisted session.
    Initialize,
    /// A session query issued by `Initialize` or a resync completed.
    QueryCompleted {
        ticket: QueryTicket,
        result: Result<Option<Session>, ProviderError>,
    },
    /// Provider change stream delivered an event.
    Changed(SessionChange),
    /// The change stream dropped events; re-query instead of replaying.
    Lagged(u64),
    StreamClosed,
    Teardown,
}

impl SessionMessage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialize => "Session::Initialize",
            Self::QueryCompleted { .. } => "Session::QueryCompleted",
            Self::Changed(_) => "Session::Changed",
            Self::Lagged(_) => "Session::Lagged",
            Self::StreamClosed => "Session::StreamClosed",
            Self::Teardown => "Session::Teardown",
        }
    }
}
