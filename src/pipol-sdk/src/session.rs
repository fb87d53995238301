//! Persisted session token storage.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Errors from session token storage
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The token file could not be read or written
    #[error("session storage unavailable at {path}: {source}")]
    Unavailable {
        /// Token file path
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// File-backed store for the session token
///
/// One token per store, kept in a single file. The file is re-read on
/// every load so a logout through another handle takes effect on the next
/// request without any in-memory invalidation.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store backed by the given token file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default token location under the platform data directory
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pipol")
            .join("token")
    }

    /// Token file backing this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token, `None` when no session is persisted
    pub async fn load(&self) -> Result<Option<String>, SessionError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.unavailable(e)),
        }
    }

    /// Persist the token, replacing any previous session
    pub async fn save(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.unavailable(e))?;
        }
        tokio::fs::write(&self.path, token)
            .await
            .map_err(|e| self.unavailable(e))?;
        debug!(path = %self.path.display(), "session token saved");
        Ok(())
    }

    /// Remove the persisted token, a no-op when none is stored
    pub async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "session token cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.unavailable(e)),
        }
    }

    fn unavailable(&self, source: io::Error) -> SessionError {
        SessionError::Unavailable {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}
