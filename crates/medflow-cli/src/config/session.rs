//! Session persistence configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result as AnyhowResult, anyhow};
use clap::Args;
use medflow_session::SessionOptions;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Default location of the session file, relative to the working directory.
pub const DEFAULT_SESSION_FILE: &str = ".medflow-session.json";

/// Session storage and lifecycle configuration.
///
/// # Environment Variables
///
/// - `MEDFLOW_SESSION_FILE` - Where the session is persisted between runs
/// - `MEDFLOW_LOGOUT_TIMEOUT` - Seconds to wait for the backend on logout (default: 5)
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct SessionConfig {
    /// File holding the session between invocations.
    ///
    /// Contains bearer credentials; it is created readable by the owner only.
    #[arg(long, env = "MEDFLOW_SESSION_FILE", default_value = DEFAULT_SESSION_FILE)]
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,

    /// Seconds to wait for the backend to acknowledge a logout.
    ///
    /// Local credentials are discarded regardless. Valid range: 1-60 seconds.
    #[arg(long, env = "MEDFLOW_LOGOUT_TIMEOUT", default_value_t = 5)]
    pub logout_timeout: u64,
}

fn default_session_file() -> PathBuf {
    PathBuf::from(DEFAULT_SESSION_FILE)
}

impl SessionConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file path is empty or the logout
    /// timeout is outside 1-60 seconds.
    pub fn validate(&self) -> AnyhowResult<()> {
        if self.session_file.as_os_str().is_empty() {
            return Err(anyhow!("Session file path must not be empty"));
        }

        if self.logout_timeout == 0 || self.logout_timeout > 60 {
            return Err(anyhow!(
                "Logout timeout {} seconds is invalid. Must be between 1 and 60 seconds.",
                self.logout_timeout
            ));
        }

        Ok(())
    }

    /// Returns the session manager options.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions::default().with_logout_timeout(Duration::from_secs(self.logout_timeout))
    }

    /// Logs the session configuration.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            session_file = %self.session_file.display(),
            logout_timeout_secs = self.logout_timeout,
            "Session configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(logout_timeout: u64) -> SessionConfig {
        SessionConfig {
            session_file: default_session_file(),
            logout_timeout,
        }
    }

    #[test]
    fn test_validate_logout_timeout_range() {
        assert!(config(5).validate().is_ok());
        assert!(config(0).validate().is_err());
        assert!(config(61).validate().is_err());
    }

    #[test]
    fn test_empty_session_file_rejected() {
        let config = SessionConfig {
            session_file: PathBuf::new(),
            logout_timeout: 5,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_session_options_carry_timeout() {
        let options = config(12).session_options();
        assert_eq!(options.logout_timeout, Duration::from_secs(12));
    }
}
