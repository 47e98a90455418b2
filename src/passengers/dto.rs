use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{ValidationError, BLANK};
use crate::passengers::repo_types::Passenger;
use crate::patch::{nullable, set};
use crate::users::{dto::UserProfile, repo_types::User};

/// Passenger as returned to clients, with the owning user embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassengerProfile {
    pub id: Uuid,
    pub user: UserProfile,
    pub passenger_id: String,
    pub preferred_payment_method: String,
    pub home_address: Option<String>,
    pub profile_picture: Option<String>,
    pub preferred_language: String,
    pub emergency_contact: Option<String>,
    pub is_verified: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PassengerProfile {
    #[cfg(test)]
    pub const READ_ONLY_FIELDS: &'static [&'static str] = &[
        "id",
        "user",
        "passenger_id",
        "is_verified",
        "created_at",
        "updated_at",
    ];
    #[cfg(test)]
    pub const READ_WRITE_FIELDS: &'static [&'static str] = &[
        "preferred_payment_method",
        "home_address",
        "profile_picture",
        "preferred_language",
        "emergency_contact",
    ];

    pub fn project(p: &Passenger, owner: &User) -> Self {
        Self {
            id: p.id,
            user: UserProfile::from(owner),
            passenger_id: p.passenger_id.clone(),
            preferred_payment_method: p.preferred_payment_method.clone(),
            home_address: p.home_address.clone(),
            profile_picture: p.profile_picture.clone(),
            preferred_language: p.preferred_language.clone(),
            emergency_contact: p.emergency_contact.clone(),
            is_verified: p.is_verified,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Partial update of passenger read-write fields. `user`, `passenger_id`,
/// `is_verified` and timestamps in the body are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct PassengerUpdate {
    pub preferred_payment_method: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub home_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub profile_picture: Option<Option<String>>,
    pub preferred_language: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub emergency_contact: Option<Option<String>>,
}

impl PassengerUpdate {
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        for (name, value) in [
            ("preferred_payment_method", self.preferred_payment_method.as_mut()),
            ("preferred_language", self.preferred_language.as_mut()),
        ] {
            if let Some(v) = value {
                *v = v.trim().to_string();
                if v.is_empty() {
                    errors.add(name, BLANK);
                }
            }
        }
        errors.into_result()
    }

    pub fn apply(self, p: &mut Passenger) {
        set(&mut p.preferred_payment_method, self.preferred_payment_method);
        set(&mut p.home_address, self.home_address);
        set(&mut p.profile_picture, self.profile_picture);
        set(&mut p.preferred_language, self.preferred_language);
        set(&mut p.emergency_contact, self.emergency_contact);
    }
}
