//! Navigation guard.

use medflow_core::SessionView;

use crate::{RouteDecision, RoutePaths, RouteRequest, TRACING_TARGET};

/// Decides whether a screen may render for the current session.
///
/// The guard is pure: it reads the session through [`SessionView`] on every
/// call, never caches a decision and never fails.
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    paths: RoutePaths,
}

impl RouteGuard {
    /// Creates a guard redirecting to the given paths.
    pub fn new(paths: RoutePaths) -> Self {
        Self { paths }
    }

    /// Returns the configured paths.
    pub fn paths(&self) -> &RoutePaths {
        &self.paths
    }

    /// Returns the home screen of the signed-in account.
    pub fn home_path(&self, session: &impl SessionView) -> &str {
        self.paths.home_for(session.current_role())
    }

    /// Checks a navigation attempt against the current session.
    ///
    /// - anonymous visitors are sent to the login screen from any guarded screen
    /// - signed-in accounts without the required role are sent to their home screen
    /// - everything else is allowed
    pub fn authorize(&self, request: &RouteRequest, session: &impl SessionView) -> RouteDecision {
        if request.requirement.requires_authentication() && !session.is_authenticated() {
            tracing::debug!(
                target: TRACING_TARGET,
                path = %request.path,
                "Anonymous visitor sent to login"
            );
            return RouteDecision::redirect(self.paths.login.as_str());
        }

        if let Some(required) = request.requirement.required_role() {
            let current = session.current_role();
            if current != Some(required) {
                let home = self.paths.home_for(current);
                tracing::debug!(
                    target: TRACING_TARGET,
                    path = %request.path,
                    required = %required,
                    current = ?current,
                    redirect = home,
                    "Role mismatch, sent to home screen"
                );
                return RouteDecision::redirect(home);
            }
        }

        RouteDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use medflow_core::{Role, Session, TokenPair, UserSummary};

    use super::*;

    const ANONYMOUS: Option<Session> = None;

    fn session(role: Role) -> Option<Session> {
        Some(Session::new(
            TokenPair::new("A1", "R1"),
            UserSummary::new(1, "alice", role),
        ))
    }

    #[test]
    fn test_anonymous_sent_to_login() {
        let guard = RouteGuard::default();
        let decision = guard.authorize(&RouteRequest::authenticated("/appointments"), &ANONYMOUS);
        assert_eq!(decision, RouteDecision::redirect("/login"));
    }

    #[test]
    fn test_anonymous_on_admin_screen_sent_to_login() {
        let guard = RouteGuard::default();
        let request = RouteRequest::role("/admin/dashboard", Role::Admin);
        assert_eq!(guard.authorize(&request, &ANONYMOUS), RouteDecision::redirect("/login"));
    }

    #[test]
    fn test_public_always_allowed() {
        let guard = RouteGuard::default();
        assert!(guard.authorize(&RouteRequest::public("/login"), &ANONYMOUS).is_allowed());
        assert!(
            guard
                .authorize(&RouteRequest::public("/register"), &session(Role::Doctor))
                .is_allowed()
        );
    }

    #[test]
    fn test_doctor_on_admin_screen_sent_home() {
        let guard = RouteGuard::default();
        let request = RouteRequest::role("/admin/dashboard", Role::Admin);
        let decision = guard.authorize(&request, &session(Role::Doctor));
        assert_eq!(decision.redirect_target(), Some("/doctor/dashboard"));
    }

    #[test]
    fn test_matching_role_allowed() {
        let guard = RouteGuard::default();
        let request = RouteRequest::role("/admin/users-list", Role::Admin);
        assert!(guard.authorize(&request, &session(Role::Admin)).is_allowed());
    }

    #[test]
    fn test_patient_on_authenticated_screen() {
        let guard = RouteGuard::default();
        let session = session(Role::Patient);
        assert!(
            guard
                .authorize(&RouteRequest::authenticated("/appointments"), &session)
                .is_allowed()
        );
        assert_eq!(guard.home_path(&session), "/patient/dashboard");
    }

    #[test]
    fn test_unrecognized_role_sent_to_generic_dashboard() {
        let guard = RouteGuard::default();
        let request = RouteRequest::role("/admin/reports", Role::Admin);
        let decision = guard.authorize(&request, &session(Role::Unknown));
        assert_eq!(decision, RouteDecision::redirect("/dashboard"));
    }

    #[test]
    fn test_empty_access_token_is_anonymous() {
        let guard = RouteGuard::new(RoutePaths::default().with_login("/signin"));
        let session = Some(Session::new(
            TokenPair::new("", "R1"),
            UserSummary::new(1, "alice", Role::Admin),
        ));
        let request = RouteRequest::role("/admin/dashboard", Role::Admin);
        assert_eq!(guard.authorize(&request, &session), RouteDecision::redirect("/signin"));
    }
}
