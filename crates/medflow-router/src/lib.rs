#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod guard;
mod paths;
mod request;
mod table;

pub use crate::guard::RouteGuard;
pub use crate::paths::{
    DEFAULT_DASHBOARD_PATH, DEFAULT_LOGIN_PATH, ROOT_PATH, RoutePaths, home_path_for_role,
};
pub use crate::request::{RouteDecision, RouteRequest, RouteRequirement};
pub use crate::table::{Route, RouteMatch, RouteParams, RoutePattern, RouteTable, RouteTarget};

/// Tracing target for navigation decisions.
pub const TRACING_TARGET: &str = "medflow_router::guard";
