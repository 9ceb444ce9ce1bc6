//! Authenticated backend client shared by all repositories.

use derive_more::Deref;
use medflow_core::{ApiRequest, ApiResponse, Result};
use medflow_session::SessionManager;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET;
use crate::model::ListResponse;

/// Entry point for the typed resource repositories.
///
/// Dereferences to the underlying [`SessionManager`], so session operations
/// such as login and logout are available on the client directly.
#[derive(Debug, Clone, Deref)]
pub struct ApiClient {
    #[deref]
    session: SessionManager,
    cancellation: Option<CancellationToken>,
}

impl ApiClient {
    /// Creates a client over an existing session.
    pub fn new(session: SessionManager) -> Self {
        Self {
            session,
            cancellation: None,
        }
    }

    /// Attaches a cancellation token to every call made through this client.
    ///
    /// A cancelled call fails with [`ErrorKind::Cancelled`] and leaves the
    /// session untouched. Clone the client first to keep an uncancellable one.
    ///
    /// [`ErrorKind::Cancelled`]: medflow_core::ErrorKind::Cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Returns the session manager.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Sends `request` through the session and returns the successful response.
    pub(crate) async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        if request.cancellation.is_none() {
            request.cancellation = self.cancellation.clone();
        }

        let method = request.method;
        let endpoint = request.endpoint.clone();

        match self.session.authenticated_request(request).await {
            Ok(response) => Ok(response),
            Err(error) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    %method,
                    %endpoint,
                    kind = error.kind_str(),
                    status = error.status,
                    "Resource call failed"
                );
                Err(error)
            }
        }
    }

    /// Sends `request` and decodes the JSON body.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.execute(request).await?.json()
    }

    /// Sends `request` and decodes a list body, paginated or not.
    pub(crate) async fn fetch_list<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Vec<T>> {
        let list: ListResponse<T> = self.fetch(request).await?;
        Ok(list.into_vec())
    }

    /// Sends `request`, discarding the body.
    pub(crate) async fn perform(&self, request: ApiRequest) -> Result<()> {
        self.execute(request).await.map(|_| ())
    }
}
