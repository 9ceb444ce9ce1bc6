//! Repositories for the backend resources.
//!
//! Each repository is a trait implemented for [`ApiClient`](crate::ApiClient);
//! bring the trait into scope to call its operations.

pub mod appointment;
pub mod clinic;
pub mod messaging;
pub mod patient;
pub mod prescription;
pub mod staff;
pub mod user;

pub use appointment::AppointmentRepository;
pub use clinic::ClinicRepository;
pub use messaging::MessagingRepository;
pub use patient::PatientRepository;
pub use prescription::PrescriptionRepository;
pub use staff::StaffRepository;
pub use user::UserRepository;
