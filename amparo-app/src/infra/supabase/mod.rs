//! Supabase adapter: GoTrue for identity, PostgREST for the `profiles`
//! table.

pub mod client;
pub mod error;
mod refresh;
pub mod rest;
pub mod storage;

pub use client::{ClientOptions, SupabaseClient};
pub use storage::SessionStorage;
