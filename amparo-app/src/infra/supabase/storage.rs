use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use amparo_model::Session;

use crate::infra::services::{ProviderError, ProviderResult};

/// JSON file holding the last session, so a restart can restore it.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when nothing was stored yet.
    pub async fn load(&self) -> ProviderResult<Option<Session>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(storage_error(&self.path, err)),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| storage_error(&self.path, err))
    }

    /// Write through a temp file so a crash never leaves half a session.
    pub async fn save(&self, session: &Session) -> ProviderResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| storage_error(parent, err))?;
        }
        let json = serde_json::to_vec(session)
            .map_err(|err| storage_error(&self.path, err))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|err| storage_error(&tmp, err))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|err| storage_error(&tmp, err))?;
        }
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|err| storage_error(&self.path, err))
    }

    pub async fn clear(&self) -> ProviderResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_error(&self.path, err)),
        }
    }
}

fn storage_error(path: &Path, err: impl std::fmt::Display) -> ProviderError {
    ProviderError::Storage(format!("{}: {err}", path.display()))
}
