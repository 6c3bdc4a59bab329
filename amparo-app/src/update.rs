use crate::common::messages::{DomainMessage, DomainUpdateResult, cross_domain};
use crate::common::task::Task;
use crate::domains::{auth, lifecycle, navigation, profile, session};
use crate::state::State;

/// Main update function: route the message to its domain, fan out the
/// resulting cross-domain events, then re-run the session guards.
pub fn update(state: &mut State, message: DomainMessage) -> Task<DomainMessage> {
    log::trace!("[Update] {}", message.name());

    let result = match message {
        DomainMessage::Session(msg) => session::update::update_session(state, msg),
        DomainMessage::Auth(msg) => auth::update::update_auth(state, msg),
        DomainMessage::Navigation(msg) => {
            navigation::update::update_navigation(state, msg)
        }
        DomainMessage::Profile(msg) => profile::update::update_profile(state, msg),
        DomainMessage::Lifecycle(msg) => {
            lifecycle::update_lifecycle(state, msg)
        }
        DomainMessage::NoOp => DomainUpdateResult::none(),
    };

    let task = cross_domain::drain(state, result);
    let guards = navigation::update::enforce_guards(state);
    Task::batch([task, guards])
}
