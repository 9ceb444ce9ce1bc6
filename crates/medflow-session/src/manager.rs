//! Session lifecycle: login, registration, logout, refresh and authenticated requests.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use medflow_core::{
    ApiRequest, ApiResponse, Error, ErrorKind, HttpTransport, Result, Session, SessionView,
    TokenPair, UserSummary,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::credentials::{Credentials, Registration};
use crate::store::SessionStore;
use crate::{TRACING_TARGET_MANAGER, TRACING_TARGET_REFRESH};

/// Backend endpoint that exchanges credentials for a token pair.
pub const LOGIN_ENDPOINT: &str = "/auth/login/";
/// Backend endpoint that creates an account and signs it in.
pub const REGISTER_ENDPOINT: &str = "/auth/register/";
/// Backend endpoint that blacklists a refresh token.
pub const LOGOUT_ENDPOINT: &str = "/auth/logout/";
/// Backend endpoint that exchanges a refresh token for a new access token.
pub const REFRESH_ENDPOINT: &str = "/auth/token/refresh/";

/// Default upper bound for the logout notification.
pub const DEFAULT_LOGOUT_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for [`SessionManager`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// How long logout waits for the backend before clearing local state anyway.
    pub logout_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            logout_timeout: DEFAULT_LOGOUT_TIMEOUT,
        }
    }
}

impl SessionOptions {
    /// Sets the logout timeout.
    pub fn with_logout_timeout(mut self, timeout: Duration) -> Self {
        self.logout_timeout = timeout;
        self
    }
}

/// Successful login or registration body.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    access: String,
    refresh: String,
    user: UserSummary,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

#[derive(Serialize)]
struct RefreshBody<'a> {
    refresh: &'a str,
}

struct SessionManagerInner {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn SessionStore>,
    state: RwLock<Option<Session>>,
    /// Serializes refreshes so at most one exchange is in flight.
    refresh_gate: Mutex<()>,
    options: SessionOptions,
}

/// Owns the client session and mediates every authenticated backend call.
///
/// The manager is cheap to clone; clones share the same session. The
/// in-memory session is authoritative for the lifetime of the manager and is
/// mirrored to the [`SessionStore`] on every change. Use
/// [`SessionManager::reload`] to pick up changes another process made to the
/// store.
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
///
/// use medflow_session::{Credentials, FileStore, SessionManager};
///
/// let manager = SessionManager::new(Arc::new(transport), Arc::new(FileStore::new(path)))?;
/// manager.login(Credentials::new("alice", "pw")).await?;
/// let response = manager.authenticated_request(ApiRequest::get("/appointments/")).await?;
/// ```
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionManagerInner>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("authenticated", &self.is_authenticated())
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a manager and restores any session held by `store`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be read.
    pub fn new(transport: Arc<dyn HttpTransport>, store: Arc<dyn SessionStore>) -> Result<Self> {
        Self::with_options(transport, store, SessionOptions::default())
    }

    /// Creates a manager with explicit options.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be read.
    pub fn with_options(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn SessionStore>,
        options: SessionOptions,
    ) -> Result<Self> {
        let session = store.load()?;

        tracing::debug!(
            target: TRACING_TARGET_MANAGER,
            restored = session.is_some(),
            "Session manager created"
        );

        let inner = SessionManagerInner {
            transport,
            store,
            state: RwLock::new(session),
            refresh_gate: Mutex::new(()),
            options,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns a snapshot of the current session.
    pub fn session(&self) -> Option<Session> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the current access token, if a non-empty one is held.
    pub fn access_token(&self) -> Option<String> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|s| s.tokens.has_access())
            .map(|s| s.access_token().to_owned())
    }

    /// Re-reads the store, replacing the in-memory session.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be read; the in-memory
    /// session is left unchanged in that case.
    pub fn reload(&self) -> Result<()> {
        let session = self.inner.store.load()?;
        tracing::debug!(
            target: TRACING_TARGET_MANAGER,
            authenticated = session.as_ref().is_some_and(|s| s.tokens.has_access()),
            "Session reloaded from store"
        );
        *self.write_state() = session;
        Ok(())
    }

    /// Signs in with the given credentials.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::InvalidCredentials`] when the backend rejects the credentials
    /// - [`ErrorKind::RequestFailed`] when the backend fails with a server error
    /// - [`ErrorKind::NetworkUnavailable`] or [`ErrorKind::Timeout`] without a response
    pub async fn login(&self, credentials: Credentials) -> Result<Session> {
        self.authenticate(LOGIN_ENDPOINT, &credentials, "Invalid credentials", None)
            .await
    }

    /// Signs in, giving up with [`ErrorKind::Cancelled`] once `cancel` fires.
    ///
    /// # Errors
    ///
    /// Same as [`SessionManager::login`], plus [`ErrorKind::Cancelled`].
    pub async fn login_cancellable(
        &self,
        credentials: Credentials,
        cancel: CancellationToken,
    ) -> Result<Session> {
        self.authenticate(
            LOGIN_ENDPOINT,
            &credentials,
            "Invalid credentials",
            Some(cancel),
        )
        .await
    }

    /// Creates an account and signs it in.
    ///
    /// # Errors
    ///
    /// Same as [`SessionManager::login`]; a rejection carries the backend's
    /// reason or the first field error.
    pub async fn register(&self, registration: Registration) -> Result<Session> {
        self.authenticate(REGISTER_ENDPOINT, &registration, "Registration failed", None)
            .await
    }

    /// Registers, giving up with [`ErrorKind::Cancelled`] once `cancel` fires.
    ///
    /// # Errors
    ///
    /// Same as [`SessionManager::register`], plus [`ErrorKind::Cancelled`].
    pub async fn register_cancellable(
        &self,
        registration: Registration,
        cancel: CancellationToken,
    ) -> Result<Session> {
        self.authenticate(
            REGISTER_ENDPOINT,
            &registration,
            "Registration failed",
            Some(cancel),
        )
        .await
    }

    /// Ends the session.
    ///
    /// The backend is notified on a best-effort basis; local state is
    /// cleared whatever the outcome.
    pub async fn logout(&self) {
        let session = self.session().filter(|s| s.tokens.has_refresh());

        if let Some(session) = session {
            self.notify_logout(&session).await;
        }

        self.clear_local();
        tracing::info!(target: TRACING_TARGET_MANAGER, "Logged out");
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::SessionExpired`] and clears the session when no
    /// refresh token is held or the exchange fails.
    pub async fn refresh(&self) -> Result<String> {
        self.refresh_inner(None, None).await
    }

    /// Refreshes, giving up with [`ErrorKind::Cancelled`] once `cancel` fires.
    ///
    /// A cancelled refresh leaves the session untouched.
    ///
    /// # Errors
    ///
    /// Same as [`SessionManager::refresh`], plus [`ErrorKind::Cancelled`].
    pub async fn refresh_cancellable(&self, cancel: CancellationToken) -> Result<String> {
        self.refresh_inner(None, Some(cancel)).await
    }

    /// Sends `request` with the current access token.
    ///
    /// A `401` triggers one refresh and one retry with the new token. The
    /// request's own cancellation token, if any, covers the whole exchange.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Unauthenticated`] when no access token is held
    /// - [`ErrorKind::SessionExpired`] when the refresh fails or the retry is
    ///   answered with `401`; the session is cleared
    /// - [`ErrorKind::RequestFailed`] for any other non-2xx status
    /// - [`ErrorKind::NetworkUnavailable`], [`ErrorKind::Timeout`] or
    ///   [`ErrorKind::Cancelled`] without a response
    pub async fn authenticated_request(&self, request: ApiRequest) -> Result<ApiResponse> {
        let Some(access) = self.access_token() else {
            return Err(Error::unauthenticated());
        };

        let response = self
            .dispatch(&request.clone().with_bearer(access.as_str()))
            .await?;
        if !response.is_unauthorized() {
            return response.error_for_status();
        }

        tracing::debug!(
            target: TRACING_TARGET_MANAGER,
            method = %request.method,
            endpoint = %request.endpoint,
            "Access token rejected, refreshing"
        );

        let fresh = self
            .refresh_inner(Some(&access), request.cancellation.clone())
            .await?;
        let retried = self.dispatch(&request.with_bearer(fresh)).await?;

        if retried.is_unauthorized() {
            tracing::warn!(
                target: TRACING_TARGET_MANAGER,
                "Refreshed access token rejected, ending session"
            );
            self.clear_local();
            let message = retried
                .detail()
                .unwrap_or_else(|| "Session expired".to_owned());
            return Err(Error::session_expired()
                .with_status(retried.status)
                .with_message(message));
        }

        retried.error_for_status()
    }

    async fn authenticate<T: Serialize>(
        &self,
        endpoint: &str,
        payload: &T,
        fallback: &str,
        cancel: Option<CancellationToken>,
    ) -> Result<Session> {
        let mut request = ApiRequest::post(endpoint).with_json(payload)?;
        if let Some(cancel) = cancel {
            request = request.with_cancellation(cancel);
        }

        let response = self.dispatch(&request).await?;

        if !response.is_success() {
            let message = response.detail().unwrap_or_else(|| fallback.to_owned());
            tracing::warn!(
                target: TRACING_TARGET_MANAGER,
                endpoint,
                status = response.status,
                "Authentication rejected"
            );
            let error = if response.status >= 500 {
                Error::request_failed(response.status)
            } else {
                Error::invalid_credentials().with_status(response.status)
            };
            return Err(error.with_message(message));
        }

        let body: AuthResponse = response.json()?;
        let session = Session::new(TokenPair::new(body.access, body.refresh), body.user);

        self.inner.store.save(&session)?;
        *self.write_state() = Some(session.clone());

        tracing::info!(
            target: TRACING_TARGET_MANAGER,
            user_id = session.user.id,
            role = %session.user.role,
            "Signed in"
        );
        Ok(session)
    }

    async fn notify_logout(&self, session: &Session) {
        let mut request = match ApiRequest::post(LOGOUT_ENDPOINT).with_json(&RefreshBody {
            refresh: session.refresh_token(),
        }) {
            Ok(request) => request.with_timeout(self.inner.options.logout_timeout),
            Err(e) => {
                tracing::warn!(target: TRACING_TARGET_MANAGER, error = %e, "Skipping logout notification");
                return;
            }
        };
        if session.tokens.has_access() {
            request = request.with_bearer(session.access_token());
        }

        let outcome =
            tokio::time::timeout(self.inner.options.logout_timeout, self.dispatch(&request)).await;

        match outcome {
            Ok(Ok(response)) if response.is_success() => {
                tracing::debug!(target: TRACING_TARGET_MANAGER, "Backend acknowledged logout");
            }
            Ok(Ok(response)) => {
                tracing::warn!(
                    target: TRACING_TARGET_MANAGER,
                    status = response.status,
                    "Backend rejected logout notification"
                );
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    target: TRACING_TARGET_MANAGER,
                    error = %e,
                    "Logout notification failed"
                );
            }
            Err(_) => {
                tracing::warn!(
                    target: TRACING_TARGET_MANAGER,
                    timeout_ms = self.inner.options.logout_timeout.as_millis(),
                    "Logout notification timed out"
                );
            }
        }
    }

    /// Refreshes the access token.
    ///
    /// With `stale_access` set, the exchange is skipped when another caller
    /// already replaced that token while this one waited for the gate.
    async fn refresh_inner(
        &self,
        stale_access: Option<&str>,
        cancel: Option<CancellationToken>,
    ) -> Result<String> {
        let _gate = match cancel.as_ref() {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => return Err(Error::cancelled()),
                guard = self.inner.refresh_gate.lock() => guard,
            },
            None => self.inner.refresh_gate.lock().await,
        };

        let Some(session) = self.session() else {
            self.clear_local();
            return Err(Error::session_expired().with_message("No session to refresh"));
        };

        if let Some(stale) = stale_access
            && session.tokens.has_access()
            && session.access_token() != stale
        {
            tracing::debug!(
                target: TRACING_TARGET_REFRESH,
                "Access token already refreshed by a concurrent request"
            );
            return Ok(session.access_token().to_owned());
        }

        if !session.tokens.has_refresh() {
            self.clear_local();
            return Err(Error::session_expired().with_message("No refresh token available"));
        }

        let mut request = ApiRequest::post(REFRESH_ENDPOINT).with_json(&RefreshBody {
            refresh: session.refresh_token(),
        })?;
        if let Some(cancel) = cancel {
            request = request.with_cancellation(cancel);
        }

        tracing::debug!(target: TRACING_TARGET_REFRESH, "Refreshing access token");

        let response = match self.dispatch(&request).await {
            Ok(response) => response,
            Err(e) if e.kind == ErrorKind::Cancelled => return Err(e),
            Err(e) => return Err(self.expire("Token refresh failed", e)),
        };

        if !response.is_success() {
            let message = response
                .detail()
                .unwrap_or_else(|| "Session expired".to_owned());
            tracing::warn!(
                target: TRACING_TARGET_REFRESH,
                status = response.status,
                "Refresh token rejected"
            );
            self.clear_local();
            return Err(Error::session_expired()
                .with_status(response.status)
                .with_message(message));
        }

        let refreshed: RefreshResponse = match response.json() {
            Ok(body) => body,
            Err(e) => return Err(self.expire("Malformed refresh response", e)),
        };

        let access = {
            let mut state = self.write_state();
            // A logout or a newer login while the exchange was in flight wins.
            let Some(current) = state
                .as_ref()
                .filter(|s| s.refresh_token() == session.refresh_token())
            else {
                return Err(Error::session_expired().with_message("Session ended during refresh"));
            };

            let mut updated = current.clone();
            updated.tokens.access = refreshed.access;
            if let Some(refresh) = refreshed.refresh.filter(|r| !r.is_empty()) {
                updated.tokens.refresh = refresh;
            }

            // The previous refresh token may already be revoked: memory keeps
            // the rotated pair even when it cannot be stored.
            if let Err(e) = self.inner.store.save(&updated) {
                tracing::error!(
                    target: TRACING_TARGET_REFRESH,
                    error = %e,
                    "Failed to store refreshed session"
                );
            }
            let access = updated.tokens.access.clone();
            *state = Some(updated);
            access
        };

        tracing::info!(target: TRACING_TARGET_REFRESH, "Access token refreshed");
        Ok(access)
    }

    /// Clears the session and wraps `source` into a session-expired error.
    fn expire(&self, message: &str, source: impl Into<medflow_core::BoxedError>) -> Error {
        tracing::warn!(target: TRACING_TARGET_REFRESH, "{message}, ending session");
        self.clear_local();
        Error::session_expired()
            .with_message(message)
            .with_source(source)
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let send = self.inner.transport.send(request);
        match request.cancellation.as_ref() {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => Err(Error::cancelled()),
                result = send => result,
            },
            None => send.await,
        }
    }

    fn clear_local(&self) {
        self.write_state().take();
        if let Err(e) = self.inner.store.clear() {
            tracing::error!(
                target: TRACING_TARGET_MANAGER,
                error = %e,
                "Failed to clear stored session"
            );
        }
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionView for SessionManager {
    fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    fn current_user(&self) -> Option<UserSummary> {
        self.session().map(|s| s.user)
    }
}
