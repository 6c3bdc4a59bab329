pub mod error;
pub mod supabase;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;

use crate::{
    Config, ConfigLoadError,
    constants::{
        DEFAULT_PASSWORD_RESET_REDIRECT, DEFAULT_REFRESH_MARGIN, PROJECT_DIRS,
        SESSION_FILE_NAME,
    },
    models::{
        AuthConfig, ConfigMetadata, StorageConfig,
        sources::{EnvConfig, FileConfig},
    },
};

/// Non-fatal findings surfaced while composing the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The backend is reached over plain HTTP on a non-loopback host.
    InsecureSupabaseUrl { host: String },
    /// No platform data directory; the session file lands in the working dir.
    NoDataDirectory { fallback: PathBuf },
    /// Session persistence is off, so every restart starts signed out.
    SessionPersistenceDisabled,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::InsecureSupabaseUrl { host } => {
                write!(f, "supabase url for host `{host}` is not https")
            }
            ConfigWarning::NoDataDirectory { fallback } => write!(
                f,
                "no platform data directory, storing session at {}",
                fallback.display()
            ),
            ConfigWarning::SessionPersistenceDisabled => {
                f.write_str("session persistence disabled")
            }
        }
    }
}

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: Vec<ConfigWarning>,
}

/// Composes [`Config`] from env, an optional TOML file and defaults.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
    env: Option<EnvConfig>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Load this `.env` file instead of searching for one.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Use a pre-gathered environment. Skips `.env` loading entirely.
    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.env = Some(env);
        self
    }

    pub fn load(self) -> Result<ConfigLoad, ConfigLoadError> {
        let (env, env_file_loaded) = match self.env {
            Some(env) => (env, false),
            None => {
                let loaded = load_env_file(self.env_file.as_deref())?;
                (EnvConfig::gather(), loaded)
            }
        };

        let config_path = self.config_path.or_else(|| env.config_path.clone());
        let file = match config_path.as_deref() {
            Some(path) => read_file_config(path)?,
            None => FileConfig::default(),
        };

        let mut warnings = Vec::new();

        let supabase = supabase::resolve_supabase(&env, &file.supabase)?;
        if supabase.url.scheme() == "http"
            && let Some(host) = supabase.url.host_str()
            && !is_loopback_host(host)
        {
            warnings.push(ConfigWarning::InsecureSupabaseUrl {
                host: host.to_string(),
            });
        }

        let auth = resolve_auth(&env, &file)?;
        if !auth.persist_session {
            warnings.push(ConfigWarning::SessionPersistenceDisabled);
        }

        let session_file = match env
            .session_file
            .clone()
            .or_else(|| file.storage.session_file.clone())
        {
            Some(path) => path,
            None => match default_session_file() {
                Some(path) => path,
                None => {
                    let fallback = PathBuf::from(".amparo").join(SESSION_FILE_NAME);
                    warnings.push(ConfigWarning::NoDataDirectory {
                        fallback: fallback.clone(),
                    });
                    fallback
                }
            },
        };

        for warning in &warnings {
            tracing::warn!("{warning}");
        }

        Ok(ConfigLoad {
            config: Config {
                supabase,
                auth,
                storage: StorageConfig { session_file },
                metadata: ConfigMetadata {
                    config_path,
                    env_file_loaded,
                },
            },
            warnings,
        })
    }
}

fn load_env_file(explicit: Option<&Path>) -> Result<bool, ConfigLoadError> {
    match explicit {
        Some(path) => dotenvy::from_path(path)
            .map(|()| true)
            .map_err(|source| ConfigLoadError::EnvFile {
                path: path.to_path_buf(),
                source,
            }),
        None => Ok(dotenvy::dotenv().is_ok()),
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| {
        ConfigLoadError::ConfigIo {
            path: path.to_path_buf(),
            source,
        }
    })?;
    toml::from_str(&raw).map_err(|source| ConfigLoadError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_auth(
    env: &EnvConfig,
    file: &FileConfig,
) -> Result<AuthConfig, ConfigLoadError> {
    let password_reset_redirect = match env
        .password_reset_redirect
        .clone()
        .or_else(|| file.auth.password_reset_redirect.clone())
    {
        Some(value) if value.trim().is_empty() => {
            return Err(ConfigLoadError::EmptyResetRedirect);
        }
        Some(value) => value.trim().to_string(),
        None => DEFAULT_PASSWORD_RESET_REDIRECT.to_string(),
    };

    let refresh_margin = parse_duration(
        "auth.refresh_margin",
        env.refresh_margin
            .as_ref()
            .or(file.auth.refresh_margin.as_ref()),
    )?
    .unwrap_or(DEFAULT_REFRESH_MARGIN);

    Ok(AuthConfig {
        password_reset_redirect,
        auto_refresh: env.auto_refresh.or(file.auth.auto_refresh).unwrap_or(true),
        persist_session: env
            .persist_session
            .or(file.auth.persist_session)
            .unwrap_or(true),
        refresh_margin,
    })
}

pub(crate) fn parse_duration(
    field: &'static str,
    raw: Option<&String>,
) -> Result<Option<Duration>, ConfigLoadError> {
    raw.map(|value| {
        humantime::parse_duration(value.trim()).map_err(|source| {
            ConfigLoadError::InvalidDuration {
                field,
                value: value.clone(),
                source,
            }
        })
    })
    .transpose()
}

fn default_session_file() -> Option<PathBuf> {
    let (qualifier, organization, application) = PROJECT_DIRS;
    ProjectDirs::from(qualifier, organization, application)
        .map(|dirs| dirs.data_dir().join(SESSION_FILE_NAME))
}

fn is_loopback_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "::1" | "[::1]")
        || host.ends_with(".localhost")
}
