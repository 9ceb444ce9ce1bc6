//! Persistent client-side session storage.
//!
//! Stores are synchronous: a write completes before the call returns and
//! never suspends the calling task.

mod file;
mod memory;

use medflow_core::{Result, Session, TokenPair, UserSummary};
use serde::{Deserialize, Serialize};

pub use self::file::FileStore;
pub use self::memory::MemoryStore;

/// Persists at most one [`Session`].
pub trait SessionStore: Send + Sync {
    /// Returns the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backing medium cannot be read.
    fn load(&self) -> Result<Option<Session>>;

    /// Replaces the stored session.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backing medium cannot be written.
    fn save(&self, session: &Session) -> Result<()>;

    /// Removes the stored session; succeeds when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backing medium cannot be written.
    fn clear(&self) -> Result<()>;
}

/// On-disk layout of a stored session, keyed under fixed names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserSummary,
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            access_token: session.tokens.access.clone(),
            refresh_token: session.tokens.refresh.clone(),
            user: session.user.clone(),
        }
    }
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        Session::new(
            TokenPair::new(stored.access_token, stored.refresh_token),
            stored.user,
        )
    }
}
