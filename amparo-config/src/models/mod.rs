pub mod sources;

use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub supabase: SupabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn session_file(&self) -> &Path {
        &self.storage.session_file
    }

    pub fn ensure_directories(&self) -> std::io::Result<()> {
        if let Some(parent) = self.storage.session_file.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

/// Hosted backend endpoint and public (anon) API key.
#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: Url,
    pub anon_key: String,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub password_reset_redirect: String,
    pub auto_refresh: bool,
    pub persist_session: bool,
    pub refresh_margin: Duration,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub session_file: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
