use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::ENV_CONFIG_PATH;
use crate::util::{first_var, parse_bool_var, path_var};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub supabase: FileSupabaseConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub storage: FileStorageConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileSupabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anon_key_file: Option<PathBuf>,
    /// Humantime duration, e.g. `"30s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_reset_redirect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_refresh: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_session: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_margin: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileStorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub supabase_anon_key_file: Option<PathBuf>,
    pub request_timeout: Option<String>,
    pub password_reset_redirect: Option<String>,
    pub auto_refresh: Option<bool>,
    pub persist_session: Option<bool>,
    pub refresh_margin: Option<String>,
    pub session_file: Option<PathBuf>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: path_var(ENV_CONFIG_PATH),
            supabase_url: first_var(&[
                "AMPARO_SUPABASE_URL",
                "SUPABASE_URL",
                "EXPO_PUBLIC_SUPABASE_URL",
            ]),
            supabase_anon_key: first_var(&[
                "AMPARO_SUPABASE_ANON_KEY",
                "SUPABASE_ANON_KEY",
                "EXPO_PUBLIC_SUPABASE_ANON_KEY",
            ]),
            supabase_anon_key_file: path_var("AMPARO_SUPABASE_ANON_KEY_FILE"),
            request_timeout: first_var(&["AMPARO_REQUEST_TIMEOUT"]),
            password_reset_redirect: first_var(&[
                "AMPARO_PASSWORD_RESET_REDIRECT",
            ]),
            auto_refresh: parse_bool_var("AMPARO_AUTO_REFRESH"),
            persist_session: parse_bool_var("AMPARO_PERSIST_SESSION"),
            refresh_margin: first_var(&["AMPARO_REFRESH_MARGIN"]),
            session_file: path_var("AMPARO_SESSION_FILE"),
        }
    }
}
