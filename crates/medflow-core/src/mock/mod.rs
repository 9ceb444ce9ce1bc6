//! Scripted transport for testing.
//!
//! [`MockTransport`] answers each `(method, endpoint)` pair from a queue of
//! scripted replies and records every request it receives, so tests can assert
//! on the exact calls, bodies and bearer credentials the session logic produced.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! medflow-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use medflow_core::mock::{MockReply, MockTransport};
//! use medflow_core::Method;
//!
//! let transport = MockTransport::new();
//! transport.push(Method::Post, "/auth/login/", MockReply::json(200, json!({ ... })));
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde_json::Value;

use crate::{ApiRequest, ApiResponse, Error, HttpTransport, Method, Result};

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Respond with the given status and JSON body.
    Json {
        status: u16,
        body: Value,
        delay: Option<Duration>,
    },
    /// Respond with the given status and raw body.
    Raw { status: u16, body: Vec<u8> },
    /// Fail without a response.
    NetworkError,
}

impl MockReply {
    /// Creates a JSON reply.
    pub fn json(status: u16, body: Value) -> Self {
        Self::Json {
            status,
            body,
            delay: None,
        }
    }

    /// Creates a JSON reply delivered after `delay`.
    pub fn delayed(status: u16, body: Value, delay: Duration) -> Self {
        Self::Json {
            status,
            body,
            delay: Some(delay),
        }
    }

    /// Creates a `401` reply with the backend's standard token error body.
    pub fn unauthorized() -> Self {
        Self::json(
            401,
            serde_json::json!({
                "detail": "Given token not valid for any token type",
                "code": "token_not_valid"
            }),
        )
    }
}

#[derive(Debug, Default)]
struct MockState {
    replies: HashMap<(Method, String), VecDeque<MockReply>>,
    fallback: HashMap<(Method, String), MockReply>,
    requests: Vec<ApiRequest>,
}

/// Transport that answers from scripted replies and records all requests.
///
/// Cloning shares the script and the recorded requests.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Creates an empty transport; unscripted calls answer `404`.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Queues a reply for the next call to `method endpoint`.
    pub fn push(&self, method: Method, endpoint: impl Into<String>, reply: MockReply) -> &Self {
        self.lock()
            .replies
            .entry((method, endpoint.into()))
            .or_default()
            .push_back(reply);
        self
    }

    /// Sets the reply used once the queue for `method endpoint` is exhausted.
    pub fn always(&self, method: Method, endpoint: impl Into<String>, reply: MockReply) -> &Self {
        self.lock().fallback.insert((method, endpoint.into()), reply);
        self
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    /// Returns the requests received for `method endpoint`.
    pub fn requests_to(&self, method: Method, endpoint: &str) -> Vec<ApiRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.endpoint == endpoint)
            .cloned()
            .collect()
    }

    /// Returns how many calls `method endpoint` received.
    pub fn calls(&self, method: Method, endpoint: &str) -> usize {
        self.requests_to(method, endpoint).len()
    }

    fn next_reply(&self, request: &ApiRequest) -> Option<MockReply> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        let key = (request.method, request.endpoint.clone());
        let queued = state.replies.get_mut(&key).and_then(VecDeque::pop_front);
        queued.or_else(|| state.fallback.get(&key).cloned())
    }
}

#[async_trait::async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let Some(reply) = self.next_reply(request) else {
            return Ok(ApiResponse::json_body(
                404,
                &serde_json::json!({ "detail": "Not found." }),
            ));
        };

        match reply {
            MockReply::Json {
                status,
                body,
                delay,
            } => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(ApiResponse::json_body(status, &body))
            }
            MockReply::Raw { status, body } => Ok(ApiResponse::new(status, body)),
            MockReply::NetworkError => {
                Err(Error::network_unavailable().with_message("Connection refused"))
            }
        }
    }
}
