mod auth;
mod profile;

pub use auth::{AuthCalls, StubAuthProvider, issue_session};
pub use profile::{ProfileCalls, StubProfileRepository};
