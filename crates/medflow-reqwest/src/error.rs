//! Internal error types for medflow-reqwest.

use thiserror::Error;

/// Result type alias for medflow-reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for medflow-reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// The configured base URL could not be parsed.
    #[error("Invalid base URL: {0}")]
    Url(#[from] url::ParseError),
    /// The configured base URL uses a scheme other than http/https.
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

impl From<Error> for medflow_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    medflow_core::Error::timeout()
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    medflow_core::Error::network_unavailable()
                        .with_message("Connection failed")
                        .with_source(e)
                } else if e.is_builder() {
                    medflow_core::Error::configuration()
                        .with_message(e.to_string())
                        .with_source(e)
                } else {
                    medflow_core::Error::network_unavailable()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Url(e) => medflow_core::Error::configuration()
                .with_message(format!("Invalid base URL: {e}"))
                .with_source(e),
            Error::UnsupportedScheme(scheme) => medflow_core::Error::configuration()
                .with_message(format!("Unsupported URL scheme: {scheme}")),
        }
    }
}
