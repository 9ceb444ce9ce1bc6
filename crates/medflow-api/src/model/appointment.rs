use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumString)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Returns true if the appointment still occupies the doctor's time.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Scheduled | Self::Confirmed | Self::InProgress)
    }
}

/// A booked appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient: i64,
    #[serde(default)]
    pub patient_name: Option<String>,
    pub doctor: i64,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub clinic: Option<i64>,
    #[serde(default)]
    pub service: Option<i64>,
    #[serde(default)]
    pub service_name: Option<String>,
    pub appointment_date: Timestamp,
    /// Length in minutes.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Appointment as echoed by the backend after a create or update.
///
/// The write endpoints answer with the submitted fields only, without the
/// display names and usually without the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAppointment {
    #[serde(default)]
    pub id: Option<i64>,
    pub patient: i64,
    pub doctor: i64,
    #[serde(default)]
    pub clinic: Option<i64>,
    #[serde(default)]
    pub service: Option<i64>,
    pub appointment_date: Timestamp,
    /// Length in minutes.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for booking an appointment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAppointment {
    pub patient: i64,
    pub doctor: i64,
    pub clinic: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<i64>,
    pub appointment_date: Timestamp,
    /// Length in minutes; the backend uses the service duration when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewAppointment {
    /// Creates a booking for `patient` with `doctor` at `appointment_date`.
    pub fn new(patient: i64, doctor: i64, clinic: i64, appointment_date: Timestamp) -> Self {
        Self {
            patient,
            doctor,
            clinic,
            service: None,
            appointment_date,
            duration: None,
            reason: None,
            notes: None,
        }
    }

    /// Books the appointment for a clinic service.
    pub fn with_service(mut self, service: i64) -> Self {
        self.service = Some(service);
        self
    }

    /// Sets the reason for the visit.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Partial update of an appointment; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateAppointment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Slot availability lookup for one doctor on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotQuery {
    pub doctor: i64,
    pub date: Date,
    /// Sizes slots to this service's duration instead of the default.
    pub service: Option<i64>,
}

impl SlotQuery {
    /// Creates a lookup for `doctor` on `date`.
    pub fn new(doctor: i64, date: Date) -> Self {
        Self {
            doctor,
            date,
            service: None,
        }
    }

    /// Sizes the slots for `service`.
    pub fn with_service(mut self, service: i64) -> Self {
        self.service = Some(service);
        self
    }

    /// Returns the query string pairs, with the date as `YYYY-MM-DD`.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("doctor_id", self.doctor.to_string()),
            ("date", self.date.to_string()),
        ];
        if let Some(service) = self.service {
            query.push(("service_id", service.to_string()));
        }
        query
    }
}

/// A bookable start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub time: Timestamp,
    pub available: bool,
}

/// Body of the slot availability endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlots {
    #[serde(default)]
    pub slots: Vec<Slot>,
}
