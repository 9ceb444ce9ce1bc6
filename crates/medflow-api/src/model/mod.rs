//! Backend resource models.
//!
//! Each model types the fields clients commonly read and keeps every other
//! field the backend sends in `extra`, so records survive a round trip
//! through the client unchanged.

mod appointment;
mod clinic;
mod messaging;
mod patient;
mod prescription;
mod staff;
mod user;

use serde::{Deserialize, Serialize};

pub use self::appointment::{
    Appointment, AppointmentStatus, AvailableSlots, NewAppointment, SavedAppointment, Slot,
    SlotQuery, UpdateAppointment,
};
pub use self::clinic::{Clinic, ClinicFields, Service, ServiceFields, ServiceType};
pub use self::messaging::{
    Conversation, ConversationFilter, LastMessage, Message, NewConversation, NewMessage,
    Participant,
};
pub use self::patient::{MedicalHistory, MedicalInfoUpdate, Patient, PatientFields};
pub use self::prescription::{Medication, NewPrescription, Prescription, PrescriptionStatus};
pub use self::staff::{Doctor, Receptionist};
pub(crate) use self::user::PatientList;
pub use self::user::{
    NewUser, PasswordReset, UserList, UserProfile, UserReply, UserStatus, UserUpdate,
};

/// A list endpoint body, either a bare array or a paginated envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    /// `[ ... ]`
    Plain(Vec<T>),
    /// `{ "count": n, "next": url, "previous": url, "results": [ ... ] }`
    Paginated {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
}

impl<T> ListResponse<T> {
    /// Returns the items, discarding pagination metadata.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Plain(items) | Self::Paginated { results: items, .. } => items,
        }
    }

    /// Returns the URL of the next page, if the backend paginated the list.
    pub fn next_page(&self) -> Option<&str> {
        match self {
            Self::Plain(_) => None,
            Self::Paginated { next, .. } => next.as_deref(),
        }
    }
}

impl<T> From<ListResponse<T>> for Vec<T> {
    fn from(list: ListResponse<T>) -> Self {
        list.into_vec()
    }
}

/// Body of action endpoints that answer with a confirmation sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReply {
    #[serde(default)]
    pub message: Option<String>,
}
