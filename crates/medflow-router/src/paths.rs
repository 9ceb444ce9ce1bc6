//! Navigation targets: the login screen, the generic dashboard and each role's home.

use medflow_core::Role;
use serde::{Deserialize, Serialize};

/// Default path of the login screen.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Default path of the generic dashboard.
pub const DEFAULT_DASHBOARD_PATH: &str = "/dashboard";

/// Application entry point.
pub const ROOT_PATH: &str = "/";

/// Returns the home screen of `role`.
///
/// Accounts with an unrecognized role, and visitors without one, land on the
/// generic dashboard.
#[must_use]
pub const fn home_path_for_role(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Admin) => "/admin/dashboard",
        Some(Role::Doctor) => "/doctor/dashboard",
        Some(Role::Receptionist) => "/receptionist/dashboard",
        Some(Role::Patient) => "/patient/dashboard",
        Some(Role::Unknown) | None => DEFAULT_DASHBOARD_PATH,
    }
}

/// Well-known screens the guard redirects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoutePaths {
    /// Where anonymous visitors are sent.
    pub login: String,
    /// Home of accounts without a role-specific dashboard.
    pub dashboard: String,
}

impl Default for RoutePaths {
    fn default() -> Self {
        Self {
            login: DEFAULT_LOGIN_PATH.to_owned(),
            dashboard: DEFAULT_DASHBOARD_PATH.to_owned(),
        }
    }
}

impl RoutePaths {
    /// Sets the login path.
    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.login = login.into();
        self
    }

    /// Sets the generic dashboard path.
    pub fn with_dashboard(mut self, dashboard: impl Into<String>) -> Self {
        self.dashboard = dashboard.into();
        self
    }

    /// Returns the home screen of `role`, using the configured generic dashboard.
    #[must_use]
    pub fn home_for(&self, role: Option<Role>) -> &str {
        match role {
            Some(Role::Unknown) | None => &self.dashboard,
            known => home_path_for_role(known),
        }
    }
}
