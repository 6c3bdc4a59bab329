//! Session domain: the single source of truth for "am I signed in, and as
//! whom".

pub mod messages;
pub mod store;
pub mod update;

pub use messages::SessionMessage;
pub use store::{QueryTicket, SessionError, SessionSnapshot, SessionStore};

#[derive(Debug, Default)]
pub struct SessionDomainState {
    pub store: SessionStore,
}
