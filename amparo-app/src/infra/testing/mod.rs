//! In-memory service doubles for tests and offline runs.

pub mod stubs;

pub use stubs::{StubAuthProvider, StubProfileRepository, issue_session};
