//! Infrastructure: service contracts and the adapters behind them.

pub mod services;
pub mod supabase;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use services::Services;
pub use supabase::SupabaseClient;
