//! The MedFlow navigation table.
//!
//! Paths are matched segment by segment; a segment written as `:name`
//! captures any non-empty value. When several patterns match, the one with
//! the most literal segments wins, so `/appointments/new` takes precedence
//! over `/appointments/:id`.

use std::collections::HashMap;

use derive_more::Deref;
use medflow_core::{Role, SessionView};

use crate::paths::ROOT_PATH;
use crate::{RouteDecision, RouteGuard, RouteRequest, RouteRequirement, TRACING_TARGET};

/// One segment of a [`RoutePattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A path pattern such as `/admin/users/:userId/edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parses a pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        let source = pattern.into();
        let segments = split_path(&source)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_owned()),
                None => Segment::Literal(segment.to_owned()),
            })
            .collect();

        Self { source, segments }
    }

    /// Returns the pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Matches a concrete path, returning the captured parameters.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let mut params = HashMap::new();
        let mut parts = split_path(path);

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_owned());
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }

        Some(RouteParams(params))
    }

    fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }
}

/// Parameters captured from a path, keyed by their pattern names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct RouteParams(HashMap<String, String>);

impl RouteParams {
    /// Returns the value captured for `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// What a matched path leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    /// A screen guarded by the given requirement.
    Screen(RouteRequirement),
    /// The signed-in account's home screen.
    RoleHome,
    /// The application entry point.
    EntryPoint,
}

/// A pattern and the target it leads to.
#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: RoutePattern,
    pub target: RouteTarget,
}

/// A path resolved against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub pattern: &'a RoutePattern,
    pub target: RouteTarget,
    pub params: RouteParams,
}

/// Navigation table with the guard applied to every lookup.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    guard: RouteGuard,
    routes: Vec<Route>,
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new(guard: RouteGuard) -> Self {
        Self {
            guard,
            routes: Vec::new(),
        }
    }

    /// Creates the MedFlow application table.
    pub fn medflow(guard: RouteGuard) -> Self {
        let admin = RouteRequirement::Role(Role::Admin);
        let signed_in = RouteRequirement::Authenticated;
        let dashboard = guard.paths().dashboard.clone();
        let login = guard.paths().login.clone();

        Self::new(guard)
            .with_route(ROOT_PATH, RouteTarget::EntryPoint)
            .with_route(dashboard, RouteTarget::RoleHome)
            .with_screen(login, RouteRequirement::Public)
            .with_screen("/register", RouteRequirement::Public)
            // Administration
            .with_screen("/admin/dashboard", admin)
            .with_screen("/admin/create-user", admin)
            .with_screen("/admin/users-list", admin)
            .with_screen("/admin/users/:userId/edit", admin)
            .with_screen("/admin/clinics-list", admin)
            .with_screen("/admin/create-clinic", admin)
            .with_screen("/admin/edit-clinic/:clinicId", admin)
            .with_screen("/admin/services-list", admin)
            .with_screen("/admin/services/create", admin)
            .with_screen("/admin/services/:serviceId/edit", admin)
            .with_screen("/admin/reports", admin)
            .with_screen("/admin/settings", admin)
            // Role dashboards
            .with_screen("/doctor/dashboard", signed_in)
            .with_screen("/receptionist/dashboard", signed_in)
            .with_screen("/receptionist/patients-list", signed_in)
            .with_screen("/receptionist/patients/:patientId", signed_in)
            .with_screen("/patient/dashboard", signed_in)
            // Appointments
            .with_screen("/appointments", signed_in)
            .with_screen("/appointments/new", signed_in)
            .with_screen("/appointments/:id", signed_in)
            .with_screen("/appointments/:id/edit", signed_in)
            // Patients
            .with_screen("/patients/new", signed_in)
            // Messaging
            .with_screen("/messaging", signed_in)
            .with_screen("/messaging/new", signed_in)
            .with_screen("/messaging/:conversationId", signed_in)
            // Prescriptions
            .with_screen("/prescriptions", signed_in)
            .with_screen("/prescriptions/:id", signed_in)
    }

    /// Adds a route.
    pub fn with_route(mut self, pattern: impl Into<String>, target: RouteTarget) -> Self {
        self.routes.push(Route {
            pattern: RoutePattern::new(pattern),
            target,
        });
        self
    }

    /// Adds a guarded screen.
    pub fn with_screen(self, pattern: impl Into<String>, requirement: RouteRequirement) -> Self {
        self.with_route(pattern, RouteTarget::Screen(requirement))
    }

    /// Returns the guard applied by [`RouteTable::resolve`].
    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Returns the registered routes.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Finds the most specific route matching `path`.
    ///
    /// Query strings and fragments are ignored.
    pub fn lookup(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = strip_query(path);
        self.routes
            .iter()
            .filter_map(|route| {
                route.pattern.matches(path).map(|params| RouteMatch {
                    pattern: &route.pattern,
                    target: route.target,
                    params,
                })
            })
            .max_by_key(|m| m.pattern.literal_count())
    }

    /// Decides what happens when navigating to `path`.
    ///
    /// - guarded screens go through [`RouteGuard::authorize`]
    /// - the generic dashboard sends signed-in accounts to their home screen
    ///   and anonymous visitors to login; accounts without a role-specific
    ///   home screen stay on it
    /// - the entry point sends to the generic dashboard or to login
    /// - unknown paths send to the entry point
    pub fn resolve(&self, path: &str, session: &impl SessionView) -> RouteDecision {
        let Some(matched) = self.lookup(path) else {
            tracing::debug!(target: TRACING_TARGET, path, "Unknown path, sent to entry point");
            return RouteDecision::redirect(ROOT_PATH);
        };

        let paths = self.guard.paths();
        match matched.target {
            RouteTarget::Screen(requirement) => self
                .guard
                .authorize(&RouteRequest::new(strip_query(path), requirement), session),
            RouteTarget::RoleHome if !session.is_authenticated() => {
                RouteDecision::redirect(paths.login.as_str())
            }
            RouteTarget::RoleHome => {
                let home = self.guard.home_path(session);
                if home == paths.dashboard {
                    RouteDecision::Allow
                } else {
                    RouteDecision::redirect(home)
                }
            }
            RouteTarget::EntryPoint if session.is_authenticated() => {
                RouteDecision::redirect(paths.dashboard.as_str())
            }
            RouteTarget::EntryPoint => RouteDecision::redirect(paths.login.as_str()),
        }
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use medflow_core::{Session, TokenPair, UserSummary};

    use super::*;

    const ANONYMOUS: Option<Session> = None;

    fn session(role: Role) -> Option<Session> {
        Some(Session::new(
            TokenPair::new("A1", "R1"),
            UserSummary::new(7, "alice", role),
        ))
    }

    fn table() -> RouteTable {
        RouteTable::medflow(RouteGuard::default())
    }

    #[test]
    fn test_pattern_captures_params() {
        let pattern = RoutePattern::new("/admin/users/:userId/edit");
        let params = pattern.matches("/admin/users/42/edit").unwrap();
        assert_eq!(params.param("userId"), Some("42"));
        assert!(pattern.matches("/admin/users/42").is_none());
        assert!(pattern.matches("/admin/users/42/edit/more").is_none());
    }

    #[test]
    fn test_trailing_slash_and_query_ignored() {
        let table = table();
        let matched = table.lookup("/appointments/5/?tab=notes").unwrap();
        assert_eq!(matched.pattern.as_str(), "/appointments/:id");
        assert_eq!(matched.params.param("id"), Some("5"));
    }

    #[test]
    fn test_literal_beats_param() {
        let table = table();
        let matched = table.lookup("/appointments/new").unwrap();
        assert_eq!(matched.pattern.as_str(), "/appointments/new");
        assert!(matched.params.is_empty());
    }

    #[test]
    fn test_patient_books_appointment() {
        let table = table();
        let alice = session(Role::Patient);
        assert_eq!(
            table.resolve("/dashboard", &alice),
            RouteDecision::redirect("/patient/dashboard")
        );
        assert!(table.resolve("/patient/dashboard", &alice).is_allowed());
        assert!(table.resolve("/appointments/new", &alice).is_allowed());
        assert_eq!(
            table.resolve("/admin/dashboard", &alice),
            RouteDecision::redirect("/patient/dashboard")
        );
    }

    #[test]
    fn test_anonymous_admin_dashboard() {
        let table = table();
        assert_eq!(
            table.resolve("/admin/dashboard", &ANONYMOUS),
            RouteDecision::redirect("/login")
        );
        assert!(table.resolve("/login", &ANONYMOUS).is_allowed());
    }

    #[test]
    fn test_entry_point() {
        let table = table();
        assert_eq!(table.resolve("/", &ANONYMOUS), RouteDecision::redirect("/login"));
        assert_eq!(
            table.resolve("/", &session(Role::Doctor)),
            RouteDecision::redirect("/dashboard")
        );
        assert_eq!(
            table.resolve("/dashboard", &ANONYMOUS),
            RouteDecision::redirect("/login")
        );
    }

    #[test]
    fn test_unknown_path_sent_to_entry_point() {
        let table = table();
        assert_eq!(
            table.resolve("/no/such/screen", &session(Role::Admin)),
            RouteDecision::redirect("/")
        );
    }

    #[test]
    fn test_unrecognized_role_stays_on_generic_dashboard() {
        let table = table();
        assert!(table.resolve("/dashboard", &session(Role::Unknown)).is_allowed());
    }

    #[test]
    fn test_admin_edit_routes() {
        let table = table();
        let admin = session(Role::Admin);
        assert!(table.resolve("/admin/services/3/edit", &admin).is_allowed());
        assert!(table.resolve("/admin/services/create", &admin).is_allowed());
        assert_eq!(
            table.resolve("/admin/edit-clinic/2", &session(Role::Receptionist)),
            RouteDecision::redirect("/receptionist/dashboard")
        );
    }
}
