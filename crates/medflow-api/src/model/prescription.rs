use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

/// Dispensing state of a prescription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumString)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PrescriptionStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
    #[serde(other)]
    Other,
}

/// One prescribed medication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instructions: String,
}

/// A prescription issued by a doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: i64,
    #[serde(default)]
    pub patient: Option<i64>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: PrescriptionStatus,
    #[serde(default)]
    pub is_picked_up: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for issuing or replacing a prescription.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPrescription {
    pub patient: i64,
    pub diagnosis: String,
    pub medications: Vec<Medication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: PrescriptionStatus,
}

impl NewPrescription {
    /// Creates an active prescription for `patient`.
    pub fn new(patient: i64, diagnosis: impl Into<String>, medications: Vec<Medication>) -> Self {
        Self {
            patient,
            diagnosis: diagnosis.into(),
            medications,
            notes: None,
            status: PrescriptionStatus::Active,
        }
    }
}
