use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to load env file {path}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("failed to read secret file {path}")]
    SecretFileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "supabase url is not configured (set AMPARO_SUPABASE_URL or [supabase].url)"
    )]
    MissingSupabaseUrl,

    #[error("invalid supabase url")]
    InvalidSupabaseUrl {
        #[source]
        source: url::ParseError,
    },

    #[error("supabase url must use http or https, got `{scheme}`")]
    UnsupportedScheme { scheme: String },

    #[error(
        "supabase anon key is not configured (set AMPARO_SUPABASE_ANON_KEY or [supabase].anon_key)"
    )]
    MissingAnonKey,

    #[error("invalid duration for `{field}`: `{value}`")]
    InvalidDuration {
        field: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("password reset redirect must not be empty")]
    EmptyResetRedirect,
}
