//! User roles known to the MedFlow backend.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Role of an account, as reported in the `user_type` field of the user profile.
///
/// Any value the backend sends that is not one of the four known roles
/// deserializes to [`Role::Unknown`] instead of failing, so that a newer backend
/// cannot lock older clients out of their session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(from = "String", into = "&'static str")]
pub enum Role {
    /// Clinic administrator.
    Admin,
    /// Practitioner.
    Doctor,
    /// Front-desk staff.
    Receptionist,
    /// Patient with a self-registered account.
    Patient,
    /// Role not recognized by this client.
    #[default]
    Unknown,
}

impl Role {
    /// Returns true for the roles this client knows how to route.
    #[must_use]
    pub const fn is_recognized(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Returns true for clinic staff roles.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::Doctor | Self::Receptionist)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}
