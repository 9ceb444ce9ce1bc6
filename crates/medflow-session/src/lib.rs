#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod credentials;
mod manager;
pub mod store;

pub use crate::credentials::{Credentials, Registration};
pub use crate::manager::{
    DEFAULT_LOGOUT_TIMEOUT, LOGIN_ENDPOINT, LOGOUT_ENDPOINT, REFRESH_ENDPOINT, REGISTER_ENDPOINT,
    SessionManager, SessionOptions,
};
pub use crate::store::{FileStore, MemoryStore, SessionStore};

/// Tracing target for session lifecycle events.
pub const TRACING_TARGET_MANAGER: &str = "medflow_session::manager";

/// Tracing target for token refresh.
pub const TRACING_TARGET_REFRESH: &str = "medflow_session::refresh";

/// Tracing target for session persistence.
pub const TRACING_TARGET_STORE: &str = "medflow_session::store";
