use medflow_core::Role;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Patient;

/// Full profile of an account.
///
/// Role-specific details (`doctor_profile`, `patient_profile`,
/// `receptionist_profile`) are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(rename = "user_type", default)]
    pub role: Role,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Date of birth as `YYYY-MM-DD`.
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Returns "First Last", or the username when no name is set.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        match name.trim() {
            "" => self.username.clone(),
            trimmed => trimmed.to_owned(),
        }
    }
}

/// Account created by an administrator.
///
/// Role-specific fields, such as a doctor's `specialization` or a
/// receptionist's `employee_id`, go through [`NewUser::with_field`].
#[derive(Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "user_type")]
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Date of birth as `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic: Option<i64>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl NewUser {
    /// Creates an account of `role` with the required login fields.
    pub fn new(
        role: Role,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            role,
            first_name: String::new(),
            last_name: String::new(),
            phone_number: None,
            date_of_birth: None,
            clinic: None,
            profile: Map::new(),
        }
    }

    /// Sets the first and last name.
    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Sets the phone number.
    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Sets the date of birth, formatted `YYYY-MM-DD`.
    pub fn with_date_of_birth(mut self, date_of_birth: impl Into<String>) -> Self {
        self.date_of_birth = Some(date_of_birth.into());
        self
    }

    /// Sets the clinic the account belongs to.
    pub fn with_clinic(mut self, clinic: i64) -> Self {
        self.clinic = Some(clinic);
        self
    }

    /// Adds a role-specific profile field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.profile.insert(name.into(), value.into());
        self
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("clinic", &self.clinic)
            .finish_non_exhaustive()
    }
}

/// Changes to an account; only set fields are sent.
///
/// Used for the signed-in user's own profile and, with role-specific fields
/// added through [`UserUpdate::with_field`], for an administrator's edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserUpdate {
    /// Adds a field outside the common account fields.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// Body of the account listing endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub users: Vec<UserProfile>,
    #[serde(default)]
    pub count: Option<u64>,
    /// Clinic the listing is scoped to, for clinic staff.
    #[serde(default)]
    pub clinic: Option<i64>,
}

/// Body of the account create and update endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserReply {
    pub user: UserProfile,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of the account activation toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStatus {
    pub is_active: bool,
    pub user: UserProfile,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of the password reset endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordReset {
    pub temporary_password: String,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl std::fmt::Debug for PasswordReset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordReset")
            .field("temporary_password", &"[REDACTED]")
            .field("user_email", &self.user_email)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Body of the clinic patient listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct PatientList {
    #[serde(default)]
    pub patients: Vec<Patient>,
}
