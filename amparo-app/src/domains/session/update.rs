use std::sync::Arc;

use crate::common::messages::{CrossDomainEvent, DomainMessage, DomainUpdateResult};
use crate::common::task::Task;
use crate::infra::services::AuthProvider;
use crate::state::State;

use super::messages::SessionMessage;
use super::store::QueryTicket;

pub fn update_session(
    state: &mut State,
    message: SessionMessage,
) -> DomainUpdateResult {
    match message {
        SessionMessage::Initialize => handle_initialize(state),

        SessionMessage::QueryCompleted { ticket, result } => {
            let session = match result {
                Ok(session) => session,
                Err(err) => {
                    // Treat an unreachable provider as signed out.
                    log::warn!("[Session] Session query failed: {err}");
                    None
                }
            };
            let before = state.domains.session.store.user_id();
            state.domains.session.store.resolve_query(ticket, session);
            session_changed(state, before)
        }

        SessionMessage::Changed(change) => {
            let before = state.domains.session.store.user_id();
            state.domains.session.store.apply_change(change);
            session_changed(state, before)
        }

        SessionMessage::Lagged(missed) => {
            log::warn!(
                "[Session] Change stream lagged by {missed} events, re-querying provider"
            );
            let ticket = state.domains.session.store.ticket();
            DomainUpdateResult::task(query_session(
                Arc::clone(&state.services.auth),
                ticket,
            ))
        }

        SessionMessage::StreamClosed => {
            state.domains.session.store.detach();
            DomainUpdateResult::none()
        }

        SessionMessage::Teardown => {
            state.domains.session.store.teardown();
            DomainUpdateResult::none()
        }
    }
}

fn handle_initialize(state: &mut State) -> DomainUpdateResult {
    if let Err(err) = state.domains.session.store.can_initialize() {
        log::warn!("[Session] Initialize ignored: {err}");
        return DomainUpdateResult::none();
    }
    let subscription = state.services.auth.subscribe();
    match state.domains.session.store.begin_initialize(subscription) {
        Ok(ticket) => {
            log::debug!("[Session] Initializing, querying persisted session");
            DomainUpdateResult::task(query_session(
                Arc::clone(&state.services.auth),
                ticket,
            ))
        }
        Err(err) => {
            log::error!("[Session] Initialize rejected: {err}");
            DomainUpdateResult::none()
        }
    }
}

fn query_session(
    auth: Arc<dyn AuthProvider>,
    ticket: QueryTicket,
) -> Task<DomainMessage> {
    Task::perform(async move { auth.get_session().await }, move |result| {
        DomainMessage::Session(SessionMessage::QueryCompleted { ticket, result })
    })
}

fn session_changed(
    state: &State,
    before: Option<amparo_model::UserId>,
) -> DomainUpdateResult {
    let after = state.domains.session.store.user_id();
    if before == after {
        return DomainUpdateResult::none();
    }
    DomainUpdateResult::event(CrossDomainEvent::SessionUserChanged {
        previous: before,
        current: after,
    })
}
