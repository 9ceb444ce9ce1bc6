use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::UserProfile;

/// A doctor's practice record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub user_full_name: Option<String>,
    #[serde(default)]
    pub clinic: Option<i64>,
    #[serde(default)]
    pub clinic_name: Option<String>,
    /// Clinic-assigned doctor number.
    #[serde(default)]
    pub doctor_id: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<u32>,
    /// Decimal amount as sent by the backend, e.g. `"80.00"`.
    #[serde(default)]
    pub consultation_fee: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Doctor {
    /// Returns the doctor's full name, falling back to the account username.
    pub fn display_name(&self) -> String {
        match (&self.user_full_name, &self.user) {
            (Some(name), _) if !name.trim().is_empty() => name.clone(),
            (_, Some(user)) => user.display_name(),
            _ => format!("#{}", self.id),
        }
    }
}

/// A receptionist's employment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receptionist {
    pub id: i64,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub clinic: Option<i64>,
    #[serde(default)]
    pub clinic_name: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Shift start as `HH:MM:SS`.
    #[serde(default)]
    pub shift_start: Option<String>,
    #[serde(default)]
    pub shift_end: Option<String>,
    /// Services the receptionist handles.
    #[serde(default)]
    pub services: Vec<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
