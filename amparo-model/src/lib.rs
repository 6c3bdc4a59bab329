//! Core data model definitions shared across Amparo crates.
//!
//! Sessions are owned by the hosted auth provider; the types here are the
//! read-only view the app keeps of them, plus the profile records stored next
//! to each identity.
#![allow(missing_docs)]

pub mod ids;
pub mod profile;
pub mod session;

pub use ids::UserId;
pub use profile::{Profile, ProfileUpdate, ProfileUpsert};
pub use session::{
    AuthChangeEvent, AuthUser, Session, SessionChange, SignUpOutcome,
};
