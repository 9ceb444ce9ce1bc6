//! Structured error handling for MedFlow client operations.

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur in client operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Login or registration was rejected by the backend.
    InvalidCredentials,
    /// The refresh token is missing or was rejected; the session is gone.
    SessionExpired,
    /// An authenticated call was attempted without any session.
    Unauthenticated,
    /// The backend answered with a non-success status.
    RequestFailed,
    /// No response was received at all.
    NetworkUnavailable,
    /// The request did not complete in time.
    Timeout,
    /// The caller cancelled the request.
    Cancelled,
    /// Serialization/deserialization error.
    Serialization,
    /// Persistent session storage failed.
    Storage,
    /// Configuration error.
    Configuration,
    /// Unknown error occurred.
    #[default]
    Unknown,
}

impl ErrorKind {
    /// Check if this error kind is typically retryable without new input.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkUnavailable | Self::Timeout)
    }

    /// Returns true if the caller is expected to send the user back to the login screen.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::Unauthenticated)
    }

    /// Human-readable fallback used when no message was attached.
    #[must_use]
    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Invalid credentials",
            Self::SessionExpired => "Your session has expired, please sign in again",
            Self::Unauthenticated => "Not authenticated",
            Self::RequestFailed => "The request failed",
            Self::NetworkUnavailable => "The server could not be reached",
            Self::Timeout => "The request timed out",
            Self::Cancelled => "The request was cancelled",
            Self::Serialization => "Unexpected response format",
            Self::Storage => "Session storage is unavailable",
            Self::Configuration => "Invalid configuration",
            Self::Unknown => "Unknown error",
        }
    }
}

/// Structured error type with classification and context tracking.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}]{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Primary error message, usually the backend-supplied reason.
    pub message: Option<String>,
    /// HTTP status code, when the backend answered.
    pub status: Option<u16>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            status: None,
            source: None,
        }
    }

    /// Creates a new error from a source error.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxedError>) -> Self {
        Self {
            kind,
            message: None,
            status: None,
            source: Some(source.into()),
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches the HTTP status the backend answered with.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Creates a new invalid credentials error.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials)
    }

    /// Creates a new session expired error.
    pub fn session_expired() -> Self {
        Self::new(ErrorKind::SessionExpired)
    }

    /// Creates a new unauthenticated error.
    pub fn unauthenticated() -> Self {
        Self::new(ErrorKind::Unauthenticated)
    }

    /// Creates a new request failed error for the given status.
    pub fn request_failed(status: u16) -> Self {
        Self::new(ErrorKind::RequestFailed).with_status(status)
    }

    /// Creates a new network unavailable error.
    pub fn network_unavailable() -> Self {
        Self::new(ErrorKind::NetworkUnavailable)
    }

    /// Creates a new timeout error.
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    /// Creates a new cancellation error.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled)
    }

    /// Creates a new serialization error.
    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// Creates a new storage error.
    pub fn storage() -> Self {
        Self::new(ErrorKind::Storage)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    #[must_use]
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }

    /// Returns the human-readable message, falling back to the kind's default.
    #[must_use]
    pub fn user_message(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }

    /// Check if this error is retryable based on its kind.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::from_source(ErrorKind::Serialization, error).with_message("Invalid JSON payload")
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::from_source(ErrorKind::Storage, error).with_message("I/O operation failed")
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_error_new() {
        let error = Error::new(ErrorKind::Unknown);
        assert_eq!(error.kind, ErrorKind::Unknown);
        assert!(error.message.is_none());
        assert!(error.status.is_none());
        assert!(error.source.is_none());
    }

    #[test]
    fn test_error_display() {
        let error = Error::invalid_credentials().with_message("No active account");

        let display_str = error.to_string();
        assert!(display_str.contains("invalid_credentials"));
        assert!(display_str.contains("No active account"));
    }

    #[test]
    fn test_user_message_fallback() {
        let error = Error::session_expired();
        assert_eq!(
            error.user_message(),
            ErrorKind::SessionExpired.default_message()
        );

        let error = Error::request_failed(404).with_message("Not found.");
        assert_eq!(error.user_message(), "Not found.");
        assert_eq!(error.status, Some(404));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = Error::from(io_error);

        assert_eq!(error.kind, ErrorKind::Storage);
        assert!(error.source.is_some());
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = Error::from(json_error);
        assert_eq!(error.kind, ErrorKind::Serialization);
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorKind::NetworkUnavailable.is_retryable());
        assert!(ErrorKind::Timeout.is_retryable());

        assert!(!ErrorKind::InvalidCredentials.is_retryable());
        assert!(!ErrorKind::SessionExpired.is_retryable());
        assert!(!ErrorKind::RequestFailed.is_retryable());
    }

    #[test]
    fn test_requires_login() {
        assert!(ErrorKind::SessionExpired.requires_login());
        assert!(ErrorKind::Unauthenticated.requires_login());
        assert!(!ErrorKind::InvalidCredentials.requires_login());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            ErrorKind::from_str("session_expired").unwrap(),
            ErrorKind::SessionExpired
        );
        assert_eq!(
            ErrorKind::from_str("network_unavailable").unwrap(),
            ErrorKind::NetworkUnavailable
        );
        assert!(ErrorKind::from_str("invalid").is_err());
    }
}
