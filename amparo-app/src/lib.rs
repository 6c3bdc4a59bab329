//! Amparo app core
//!
//! Session-gated navigation and the authentication flows of the Amparo
//! eldercare app. The crate is organized as domains with Elm-style update
//! functions driven by the headless [`app::App`] runtime; the `amparo`
//! binary in `src/main.rs` is a thin command-line shell over it.
//!
//! Notes
//! - The session itself is owned by the hosted provider (Supabase); the app
//!   only observes it through [`domains::session::SessionStore`].
//! - In-memory service doubles live in `infra::testing` behind the
//!   `testing` feature.

pub mod app;
pub mod common;
pub mod domains;
pub mod infra;
pub mod state;
pub mod update;
