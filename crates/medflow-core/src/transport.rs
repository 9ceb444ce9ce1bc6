//! HTTP transport seam between session logic and the network.
//!
//! The session and API crates never talk to an HTTP library directly. They
//! describe each call as an [`ApiRequest`] and hand it to an [`HttpTransport`],
//! which answers with an [`ApiResponse`] for every status code it receives and
//! only fails when no response was obtained at all.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use strum::{AsRefStr, Display, IntoStaticStr};
use tokio_util::sync::CancellationToken;

use crate::{Error, Result, detail};

/// HTTP methods used by the MedFlow backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// A single call to the backend, relative to the configured base URL.
#[derive(Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Endpoint path, e.g. `/appointments/12/`.
    pub endpoint: String,
    /// Query string parameters, in order.
    pub query: Vec<(String, String)>,
    /// Extra headers.
    pub headers: HashMap<String, String>,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
    /// Bearer credential to attach.
    pub bearer: Option<String>,
    /// Per-request timeout (uses the transport default if not set).
    pub timeout: Option<Duration>,
    /// Signal that aborts the call when triggered.
    pub cancellation: Option<CancellationToken>,
}

impl ApiRequest {
    /// Creates a new request without body or credentials.
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: Vec::new(),
            headers: HashMap::new(),
            body: None,
            bearer: None,
            timeout: None,
            cancellation: None,
        }
    }

    /// Creates a GET request.
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    /// Creates a POST request.
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Post, endpoint)
    }

    /// Creates a PUT request.
    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Put, endpoint)
    }

    /// Creates a PATCH request.
    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Patch, endpoint)
    }

    /// Creates a DELETE request.
    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Delete, endpoint)
    }

    /// Serializes `body` as the JSON payload.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `body` cannot be represented as JSON.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Sets an already-built JSON payload.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Appends a query string parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Adds a custom header to the request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attaches a bearer credential, replacing any previous one.
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the cancellation signal for this call.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Returns true if the caller already cancelled this call.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("endpoint", &self.endpoint)
            .field("query", &self.query)
            .field("has_body", &self.body.is_some())
            .field("has_bearer", &self.bearer.is_some())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Response received from the backend, whatever its status.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, lower-cased names.
    pub headers: HashMap<String, String>,
    /// Raw body.
    pub body: Bytes,
}

impl ApiResponse {
    /// Creates a response with the given status and raw body.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Creates a response carrying a JSON body.
    pub fn json_body(status: u16, body: &serde_json::Value) -> Self {
        let bytes = serde_json::to_vec(body).unwrap_or_default();
        Self::new(status, bytes).with_header("content-type", "application/json")
    }

    /// Adds a header to the response.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Returns whether the call succeeded (2xx status code).
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns whether the backend rejected the credentials (401).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Deserializes the body as JSON.
    ///
    /// An empty body deserializes as JSON `null`, so `()` and `Option<T>`
    /// targets accept `204 No Content`.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.is_empty() {
            return serde_json::from_value(serde_json::Value::Null).map_err(Error::from);
        }
        serde_json::from_slice(&self.body).map_err(|e| {
            Error::from(e).with_message(format!("Unexpected response body (HTTP {})", self.status))
        })
    }

    /// Parses the body as JSON, returning `None` when it is not JSON.
    #[must_use]
    pub fn json_value(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Extracts the backend's human-readable failure reason, if present.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        self.json_value().as_ref().and_then(detail::extract_detail)
    }

    /// Converts a non-success response into a [`crate::ErrorKind::RequestFailed`] error.
    ///
    /// # Errors
    ///
    /// Returns the failure when the status is not 2xx, otherwise hands the response back.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let message = self
            .detail()
            .unwrap_or_else(|| format!("HTTP {}", self.status));
        Err(Error::request_failed(self.status).with_message(message))
    }
}

/// Sends [`ApiRequest`]s to the backend.
///
/// Implementations return `Ok` for every response received, whatever its status,
/// and fail with [`crate::ErrorKind::NetworkUnavailable`] or
/// [`crate::ErrorKind::Timeout`] when no response was obtained.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs the call.
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::get("/appointments/available_slots/")
            .with_query("doctor_id", 4)
            .with_query("date", "2026-10-19")
            .with_bearer("A1");

        assert_eq!(request.method, Method::Get);
        assert_eq!(request.query.len(), 2);
        assert_eq!(request.query[0], ("doctor_id".to_owned(), "4".to_owned()));
        assert_eq!(request.bearer.as_deref(), Some("A1"));
        assert!(!request.is_cancelled());
    }

    #[test]
    fn test_debug_hides_bearer() {
        let request = ApiRequest::get("/patients/").with_bearer("top-secret");
        assert!(!format!("{request:?}").contains("top-secret"));
    }

    #[test]
    fn test_method_names() {
        assert_eq!(Method::Patch.as_ref(), "PATCH");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_empty_body_deserializes_as_unit() {
        let response = ApiResponse::new(204, Bytes::new());
        response.json::<()>().unwrap();
        assert!(response.json::<Option<u32>>().unwrap().is_none());
    }

    #[test]
    fn test_error_for_status_uses_detail() {
        let response = ApiResponse::json_body(403, &json!({ "detail": "Forbidden." }));
        let error = response.error_for_status().unwrap_err();

        assert_eq!(error.kind, ErrorKind::RequestFailed);
        assert_eq!(error.status, Some(403));
        assert_eq!(error.message.as_deref(), Some("Forbidden."));
    }

    #[test]
    fn test_error_for_status_without_json() {
        let response = ApiResponse::new(502, "Bad gateway");
        let error = response.error_for_status().unwrap_err();
        assert_eq!(error.message.as_deref(), Some("HTTP 502"));
    }

    #[test]
    fn test_success_passes_through() {
        let response = ApiResponse::json_body(200, &json!({ "ok": true }));
        let response = response.error_for_status().unwrap();
        assert!(response.is_success());
    }
}
