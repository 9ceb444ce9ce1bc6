use std::fs;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};

use medflow_core::{Error, Result, Session};

use super::{SessionStore, StoredSession};
use crate::TRACING_TARGET_STORE;

/// Persists the session as a JSON document on disk.
///
/// The document holds three fixed keys: `access_token`, `refresh_token`
/// and `user`. Writes go to a sibling temporary file that is then renamed
/// over the target, so a crash never leaves a half-written session behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn storage_error(&self, action: &str, error: std::io::Error) -> Error {
        Error::from(error).with_message(format!(
            "Failed to {action} session file {}",
            self.path.display()
        ))
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<Option<Session>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.storage_error("read", e)),
        };

        match serde_json::from_slice::<StoredSession>(&bytes) {
            Ok(stored) => Ok(Some(stored.into())),
            Err(e) => {
                // An unreadable document cannot describe a valid session.
                tracing::warn!(
                    target: TRACING_TARGET_STORE,
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring corrupt session file"
                );
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.storage_error("create directory for", e))?;
        }

        let document = serde_json::to_vec_pretty(&StoredSession::from(session))?;
        let temp_path = self.temp_path();

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&temp_path)
            .map_err(|e| self.storage_error("write", e))?;
        file.write_all(&document)
            .and_then(|()| file.sync_all())
            .map_err(|e| self.storage_error("write", e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| self.storage_error("replace", e))?;

        tracing::debug!(
            target: TRACING_TARGET_STORE,
            path = %self.path.display(),
            "Session persisted"
        );
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.storage_error("remove", e)),
        }
    }
}
