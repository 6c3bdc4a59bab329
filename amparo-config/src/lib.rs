//! Shared configuration library for Amparo.
//!
//! Configuration is composed from three layers, highest precedence first:
//! process environment (optionally seeded from a `.env` file), a TOML file,
//! and built-in defaults. The loader validates the composed result once so
//! the rest of the app can treat [`Config`] as trusted.

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;

pub use loader::{ConfigLoad, ConfigLoader, ConfigWarning, error::ConfigLoadError};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{AuthConfig, Config, ConfigMetadata, StorageConfig, SupabaseConfig};
