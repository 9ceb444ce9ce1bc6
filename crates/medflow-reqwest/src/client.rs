//! Reqwest-based HTTP transport for the MedFlow backend.

use std::collections::HashMap;
use std::sync::Arc;

use medflow_core::{ApiRequest, ApiResponse, HttpTransport, Method};
use reqwest::Client;
use url::Url;

use crate::{ReqwestConfig, Result, TRACING_TARGET};

/// Inner client that holds the HTTP client and configuration.
struct ReqwestClientInner {
    http: Client,
    base_url: Url,
    config: ReqwestConfig,
}

/// Reqwest-based transport that sends [`ApiRequest`]s to the MedFlow backend.
///
/// Endpoints are resolved relative to the configured base URL, so
/// `/auth/login/` against `http://localhost:8000/api` becomes
/// `http://localhost:8000/api/auth/login/`.
///
/// # Examples
///
/// ```rust,ignore
/// use medflow_core::{ApiRequest, HttpTransport};
/// use medflow_reqwest::{ReqwestClient, ReqwestConfig};
///
/// let client = ReqwestClient::new(ReqwestConfig::default())?;
/// let response = client.send(&ApiRequest::get("/services/")).await?;
/// ```
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new reqwest client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: ReqwestConfig) -> Result<Self> {
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();
        let base_url = config.parsed_base_url()?;

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %base_url,
            timeout_ms = timeout.as_millis(),
            "Creating reqwest client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()?;

        let inner = ReqwestClientInner {
            http,
            base_url,
            config,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Resolves an endpoint path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = endpoint.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.endpoint_url(&request.endpoint)?;

        let mut http_request = self
            .inner
            .http
            .request(Self::method(request.method), url)
            .header("Accept", "application/json");

        if !request.query.is_empty() {
            http_request = http_request.query(&request.query);
        }

        if let Some(ref token) = request.bearer {
            http_request = http_request.bearer_auth(token);
        }

        if let Some(timeout) = request.timeout {
            http_request = http_request.timeout(timeout);
        }

        for (name, value) in &request.headers {
            http_request = http_request.header(name, value);
        }

        if let Some(ref body) = request.body {
            http_request = http_request.json(body);
        }

        let http_response = http_request.send().await?;

        let status = http_response.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in http_response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_owned(), v.to_owned());
            }
        }
        let body = http_response.bytes().await?;

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestClient {
    async fn send(&self, request: &ApiRequest) -> medflow_core::Result<ApiResponse> {
        tracing::debug!(
            target: TRACING_TARGET,
            method = %request.method,
            endpoint = %request.endpoint,
            authenticated = request.bearer.is_some(),
            "Sending request"
        );

        match self.execute(request).await {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    method = %request.method,
                    endpoint = %request.endpoint,
                    status = response.status,
                    "Request completed"
                );
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    method = %request.method,
                    endpoint = %request.endpoint,
                    error = %err,
                    "Request failed without a response"
                );
                Err(err.into())
            }
        }
    }
}
