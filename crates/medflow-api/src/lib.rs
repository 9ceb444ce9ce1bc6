#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
pub mod model;
pub mod query;

pub use crate::client::ApiClient;
pub use crate::query::{
    AppointmentRepository, ClinicRepository, MessagingRepository, PatientRepository,
    PrescriptionRepository, StaffRepository, UserRepository,
};

/// Tracing target for resource calls.
pub const TRACING_TARGET: &str = "medflow_api::query";

/// Convenient re-exports for common use.
pub mod prelude {
    pub use crate::ApiClient;
    pub use crate::model::*;
    pub use crate::query::{
        AppointmentRepository, ClinicRepository, MessagingRepository, PatientRepository,
        PrescriptionRepository, StaffRepository, UserRepository,
    };
}
