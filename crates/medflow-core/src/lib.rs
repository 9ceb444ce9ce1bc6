#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod role;
mod session;
mod transport;
mod user;

pub mod detail;
pub mod prelude;

#[cfg(feature = "test-utils")]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use role::Role;
pub use session::{Session, SessionView, TokenPair};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method};
pub use user::UserSummary;
