//! Navigation requests and the guard's verdicts.

use medflow_core::Role;

/// Access level a screen demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteRequirement {
    /// Anyone may see the screen.
    Public,
    /// Any signed-in account may see the screen.
    Authenticated,
    /// Only accounts with this role may see the screen.
    Role(Role),
}

impl RouteRequirement {
    /// Returns true if the screen is hidden from anonymous visitors.
    #[must_use]
    pub const fn requires_authentication(&self) -> bool {
        !matches!(self, Self::Public)
    }

    /// Returns the role the screen is restricted to, if any.
    #[must_use]
    pub const fn required_role(&self) -> Option<Role> {
        match self {
            Self::Role(role) => Some(*role),
            Self::Public | Self::Authenticated => None,
        }
    }
}

/// A single navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub path: String,
    pub requirement: RouteRequirement,
}

impl RouteRequest {
    /// Creates a navigation request.
    pub fn new(path: impl Into<String>, requirement: RouteRequirement) -> Self {
        Self {
            path: path.into(),
            requirement,
        }
    }

    /// Creates a request for a public screen.
    pub fn public(path: impl Into<String>) -> Self {
        Self::new(path, RouteRequirement::Public)
    }

    /// Creates a request for a screen that needs any signed-in account.
    pub fn authenticated(path: impl Into<String>) -> Self {
        Self::new(path, RouteRequirement::Authenticated)
    }

    /// Creates a request for a screen restricted to `role`.
    pub fn role(path: impl Into<String>, role: Role) -> Self {
        Self::new(path, RouteRequirement::Role(role))
    }
}

/// Outcome of a navigation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested screen.
    Allow,
    /// Navigate to the given path instead, replacing the history entry.
    RedirectTo(String),
}

impl RouteDecision {
    /// Creates a redirect decision.
    pub fn redirect(path: impl Into<String>) -> Self {
        Self::RedirectTo(path.into())
    }

    /// Returns true if the screen may render.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns the redirect target, if any.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::RedirectTo(path) => Some(path),
        }
    }
}
