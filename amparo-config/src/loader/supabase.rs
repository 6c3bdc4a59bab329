use std::{fs::read_to_string, path::Path, time::Duration};

use url::Url;

use crate::{
    ConfigLoadError,
    constants::DEFAULT_REQUEST_TIMEOUT,
    models::{
        SupabaseConfig,
        sources::{EnvConfig, FileSupabaseConfig},
    },
};

use super::parse_duration;

pub fn resolve_supabase(
    env: &EnvConfig,
    file: &FileSupabaseConfig,
) -> Result<SupabaseConfig, ConfigLoadError> {
    let url = resolve_supabase_url(env, file)?;
    let anon_key =
        resolve_anon_key(env, file)?.ok_or(ConfigLoadError::MissingAnonKey)?;
    let request_timeout = parse_duration(
        "supabase.request_timeout",
        env.request_timeout.as_ref().or(file.request_timeout.as_ref()),
    )?
    .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

    Ok(SupabaseConfig {
        url,
        anon_key,
        request_timeout: clamp_timeout(request_timeout),
    })
}

pub fn resolve_supabase_url(
    env: &EnvConfig,
    file: &FileSupabaseConfig,
) -> Result<Url, ConfigLoadError> {
    let raw = env
        .supabase_url
        .clone()
        .or_else(|| file.url.clone())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigLoadError::MissingSupabaseUrl)?;

    let mut parsed = Url::parse(&raw)
        .map_err(|source| ConfigLoadError::InvalidSupabaseUrl { source })?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConfigLoadError::UnsupportedScheme {
                scheme: other.to_string(),
            });
        }
    }

    // Endpoint paths are joined onto the base, so it must end with '/'.
    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }

    Ok(parsed)
}

pub fn resolve_anon_key(
    env: &EnvConfig,
    file: &FileSupabaseConfig,
) -> Result<Option<String>, ConfigLoadError> {
    if let Some(key) = env
        .supabase_anon_key
        .clone()
        .filter(|value| !value.trim().is_empty())
    {
        return Ok(Some(key.trim().to_string()));
    }

    for path in [
        env.supabase_anon_key_file.as_ref(),
        file.anon_key_file.as_ref(),
    ]
    .into_iter()
    .flatten()
    {
        if let Some(secret) = read_secret_file(path)? {
            return Ok(Some(secret));
        }
    }

    Ok(file
        .anon_key
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string))
}

pub fn read_secret_file(
    path: &Path,
) -> Result<Option<String>, ConfigLoadError> {
    let contents = read_to_string(path).map_err(|source| {
        ConfigLoadError::SecretFileIo {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

fn clamp_timeout(timeout: Duration) -> Duration {
    if timeout.is_zero() {
        tracing::warn!(
            "supabase.request_timeout must be positive; using default {:?}",
            DEFAULT_REQUEST_TIMEOUT
        );
        DEFAULT_REQUEST_TIMEOUT
    } else {
        timeout
    }
}
