//! Authenticated session state.

use serde::{Deserialize, Serialize};

use crate::{Role, UserSummary};

/// Access and refresh token pair issued by the backend.
///
/// Both tokens are opaque to the client. `Debug` never prints them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived credential presented on each authenticated request.
    pub access: String,
    /// Longer-lived credential used solely to obtain a new access token.
    pub refresh: String,
}

impl TokenPair {
    /// Creates a new token pair.
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    /// Returns true when an access token is present.
    #[must_use]
    pub fn has_access(&self) -> bool {
        !self.access.is_empty()
    }

    /// Returns true when a refresh token is present.
    #[must_use]
    pub fn has_refresh(&self) -> bool {
        !self.refresh.is_empty()
    }
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

/// Authenticated state of one client: the token pair plus the user snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Current credentials.
    pub tokens: TokenPair,
    /// Account the tokens were issued for.
    pub user: UserSummary,
}

impl Session {
    /// Creates a new session.
    pub fn new(tokens: TokenPair, user: UserSummary) -> Self {
        Self { tokens, user }
    }

    /// Returns the current access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.tokens.access
    }

    /// Returns the current refresh token.
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.tokens.refresh
    }
}

/// Read-only view of the current session, used for navigation decisions.
///
/// Presence of a non-empty access token is the only authentication signal;
/// implementations never validate the token itself.
pub trait SessionView {
    /// Returns true iff an access token is currently held.
    fn is_authenticated(&self) -> bool;

    /// Returns the signed-in account, if any.
    fn current_user(&self) -> Option<UserSummary>;

    /// Returns the role of the signed-in account, if any.
    fn current_role(&self) -> Option<Role> {
        self.current_user().map(|user| user.role)
    }
}

impl SessionView for Option<Session> {
    fn is_authenticated(&self) -> bool {
        self.as_ref().is_some_and(|s| s.tokens.has_access())
    }

    fn current_user(&self) -> Option<UserSummary> {
        self.as_ref().map(|s| s.user.clone())
    }
}

impl<T: SessionView + ?Sized> SessionView for &T {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }

    fn current_user(&self) -> Option<UserSummary> {
        (**self).current_user()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_tokens() {
        let tokens = TokenPair::new("secret-access", "secret-refresh");
        let debug = format!("{tokens:?}");
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_option_session_view() {
        let none: Option<Session> = None;
        assert!(!none.is_authenticated());
        assert!(none.current_role().is_none());

        let session = Session::new(
            TokenPair::new("A1", "R1"),
            UserSummary::new(1, "alice", Role::Patient),
        );
        let some = Some(session);
        assert!(some.is_authenticated());
        assert_eq!(some.current_role(), Some(Role::Patient));
    }

    #[test]
    fn test_empty_access_token_is_not_authenticated() {
        let session = Session::new(
            TokenPair::new("", "R1"),
            UserSummary::new(1, "alice", Role::Patient),
        );
        assert!(!Some(session).is_authenticated());
    }
}
