//! Cross-domain event coordination.
//!
//! Keeps domain boundaries intact: a domain reports what happened and this
//! module decides which other domains react.

use crate::common::messages::{
    CrossDomainEvent, DomainMessage, DomainUpdateResult,
};
use crate::common::task::Task;
use crate::domains::{auth, navigation, profile};
use crate::state::State;

pub fn handle_event(
    state: &mut State,
    event: CrossDomainEvent,
) -> Task<DomainMessage> {
    log::debug!("[CrossDomain] Processing event: {:?}", event);

    match event {
        CrossDomainEvent::SessionUserChanged { previous, current } => {
            log::info!(
                "[CrossDomain] Session user changed: {:?} -> {:?}",
                previous,
                current
            );
            profile::update::on_session_user_changed(state, current)
        }

        CrossDomainEvent::RouteChanged { from, to } => {
            handle_route_changed(state, from, to)
        }

        CrossDomainEvent::UserSignedOut => {
            let result = navigation::update::navigate(state, |router| {
                router.redirect(navigation::Route::Login)
            });
            drain(state, result)
        }

        CrossDomainEvent::NoticeRaised { title, message } => {
            profile::update::raise_notice(state, title, message)
        }
    }
}

/// Flatten an update result: its task plus the tasks of every event it
/// raised, handled in order.
pub fn drain(state: &mut State, result: DomainUpdateResult) -> Task<DomainMessage> {
    let mut tasks = Vec::with_capacity(result.events.len() + 1);
    tasks.push(result.task);
    for event in result.events {
        tasks.push(handle_event(state, event));
    }
    Task::batch(tasks)
}

fn handle_route_changed(
    state: &mut State,
    from: navigation::Route,
    to: navigation::Route,
) -> Task<DomainMessage> {
    log::debug!("[CrossDomain] Route changed: {from:?} -> {to:?}");
    if from == to {
        return Task::none();
    }
    let auth_task = auth::update::on_route_changed(state, from, to);
    let profile_task = profile::update::on_route_changed(state, from, to);
    Task::batch([auth_task, profile_task])
}
