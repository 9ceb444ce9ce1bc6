//! Convenient re-exports for common use.

pub use crate::error::{BoxedError, Error, ErrorKind, Result};
pub use crate::role::Role;
pub use crate::session::{Session, SessionView, TokenPair};
pub use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method};
pub use crate::user::UserSummary;
