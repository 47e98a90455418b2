use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::patch::{nullable, set};
use crate::riders::repo_types::{Rider, VerificationStatus};
use crate::users::{dto::UserProfile, repo_types::User};

/// Rider as returned to clients, with the owning user embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiderProfile {
    pub id: Uuid,
    pub user: UserProfile,
    pub profile_picture: Option<String>,
    pub license_number: Option<String>,
    pub license_picture: Option<String>,
    pub id_number_picture: Option<String>,
    pub verification_status: VerificationStatus,
    pub verification_notes: Option<String>,
    pub is_available: bool,
    pub current_latitude: Option<f64>,
    pub current_longitude: Option<f64>,
    pub average_rating: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl RiderProfile {
    #[cfg(test)]
    pub const READ_ONLY_FIELDS: &'static [&'static str] = &[
        "id",
        "user",
        "verification_status",
        "verification_notes",
        "average_rating",
        "created_at",
        "updated_at",
    ];
    #[cfg(test)]
    pub const READ_WRITE_FIELDS: &'static [&'static str] = &[
        "profile_picture",
        "license_number",
        "license_picture",
        "id_number_picture",
        "is_available",
        "current_latitude",
        "current_longitude",
    ];

    pub fn project(r: &Rider, owner: &User) -> Self {
        Self {
            id: r.id,
            user: UserProfile::from(owner),
            profile_picture: r.profile_picture.clone(),
            license_number: r.license_number.clone(),
            license_picture: r.license_picture.clone(),
            id_number_picture: r.id_number_picture.clone(),
            verification_status: r.verification_status,
            verification_notes: r.verification_notes.clone(),
            is_available: r.is_available,
            current_latitude: r.current_latitude,
            current_longitude: r.current_longitude,
            average_rating: r.average_rating,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Partial update of rider read-write fields. Verification state, rating and
/// timestamps in the body are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RiderUpdate {
    #[serde(default, deserialize_with = "nullable")]
    pub profile_picture: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub license_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub license_picture: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub id_number_picture: Option<Option<String>>,
    pub is_available: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub current_latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub current_longitude: Option<Option<f64>>,
}

fn check_range(errors: &mut ValidationError, name: &str, value: Option<Option<f64>>, bound: f64) {
    if let Some(Some(v)) = value {
        if v < -bound {
            errors.add(name, format!("Ensure this value is greater than or equal to {}.", -bound));
        } else if v > bound {
            errors.add(name, format!("Ensure this value is less than or equal to {}.", bound));
        }
    }
}

impl RiderUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        check_range(&mut errors, "current_latitude", self.current_latitude, 90.0);
        check_range(&mut errors, "current_longitude", self.current_longitude, 180.0);
        errors.into_result()
    }

    pub fn apply(self, r: &mut Rider) {
        set(&mut r.profile_picture, self.profile_picture);
        set(&mut r.license_number, self.license_number);
        set(&mut r.license_picture, self.license_picture);
        set(&mut r.id_number_picture, self.id_number_picture);
        set(&mut r.is_available, self.is_available);
        set(&mut r.current_latitude, self.current_latitude);
        set(&mut r.current_longitude, self.current_longitude);
    }
}
