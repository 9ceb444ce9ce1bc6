use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

/// A clinic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinic {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Editable clinic fields; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClinicFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form opening hours, keyed by weekday.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Category of a clinic service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Consultation,
    Checkup,
    Surgery,
    Therapy,
    Vaccination,
    Dental,
    #[serde(other)]
    Other,
}

/// A service a clinic offers for booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub clinic: Option<i64>,
    #[serde(default)]
    pub clinic_name: Option<String>,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    /// Length in minutes.
    #[serde(default)]
    pub duration: Option<u32>,
    /// Decimal amount as sent by the backend, e.g. `"50.00"`.
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Editable service fields; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<ServiceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Length in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Decimal amount, e.g. `"50.00"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unknown_service_type() {
        let service: Service = serde_json::from_value(json!({
            "id": 1,
            "name": "Acupuncture",
            "service_type": "alternative",
            "price": "45.00",
        }))
        .unwrap();
        assert_eq!(service.service_type, Some(ServiceType::Other));
        assert_eq!(service.price.as_deref(), Some("45.00"));
    }

    #[test]
    fn test_clinic_keeps_opening_hours() {
        let clinic: Clinic = serde_json::from_value(json!({
            "id": 2,
            "name": "Clinique du Parc",
            "city": "Lyon",
            "opening_hours": { "monday": "08:00-18:00" },
            "created_at": "2025-01-01T08:00:00Z",
        }))
        .unwrap();
        assert_eq!(clinic.city.as_deref(), Some("Lyon"));
        assert_eq!(clinic.extra["opening_hours"]["monday"], "08:00-18:00");
    }
}
