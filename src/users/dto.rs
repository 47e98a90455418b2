use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{ValidationError, BLANK};
use crate::patch::{clean_optional, nullable, set};
use crate::users::repo_types::{User, UserType};
use crate::users::services::{is_valid_email, normalize_email, INVALID_EMAIL};

/// Raw sign-up body. Every field is optional here so missing values surface
/// as field errors rather than a body rejection.
#[derive(Default, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub password2: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub user_type: Option<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("password2", &self.password2.as_ref().map(|_| "<redacted>"))
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone_number", &self.phone_number)
            .field("user_type", &self.user_type)
            .finish()
    }
}

/// Output of a successful registration. Passwords are input-only.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub user_type: UserType,
}

impl From<&User> for RegisteredUser {
    fn from(u: &User) -> Self {
        Self {
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            phone_number: u.phone_number.clone(),
            user_type: u.user_type,
        }
    }
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub user_type: UserType,
    #[serde(with = "time::serde::rfc3339")]
    pub date_joined: OffsetDateTime,
}

impl UserProfile {
    #[cfg(test)]
    pub const READ_ONLY_FIELDS: &'static [&'static str] = &["id", "date_joined"];
    #[cfg(test)]
    pub const READ_WRITE_FIELDS: &'static [&'static str] =
        &["email", "first_name", "last_name", "phone_number", "user_type"];
}

impl From<&User> for UserProfile {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            phone_number: u.phone_number.clone(),
            user_type: u.user_type,
            date_joined: u.date_joined,
        }
    }
}

/// Partial update of the read-write user fields. Anything else in the body
/// (`id`, `date_joined`, `password`) is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone_number: Option<Option<String>>,
    /// Raw choice; resolved by `validate` so a bad value is a field error.
    pub user_type: Option<String>,
    #[serde(skip)]
    pub(crate) resolved_user_type: Option<UserType>,
}

impl UserUpdate {
    /// Normalises values in place and checks them field by field.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();

        if let Some(email) = self.email.as_mut() {
            *email = normalize_email(email);
            if email.is_empty() {
                errors.add("email", BLANK);
            } else if !is_valid_email(email) {
                errors.add("email", INVALID_EMAIL);
            }
        }
        for (name, value) in [
            ("first_name", self.first_name.as_mut()),
            ("last_name", self.last_name.as_mut()),
        ] {
            if let Some(v) = value {
                *v = v.trim().to_string();
                if v.is_empty() {
                    errors.add(name, BLANK);
                }
            }
        }
        if let Some(phone) = self.phone_number.take() {
            self.phone_number = Some(clean_optional(phone));
        }
        if let Some(raw) = self.user_type.as_deref() {
            match raw.parse::<UserType>() {
                Ok(t) => self.resolved_user_type = Some(t),
                Err(msg) => errors.add("user_type", msg),
            }
        }

        errors.into_result()
    }

    /// Call after a successful `validate`.
    pub fn apply(self, user: &mut User) {
        set(&mut user.email, self.email);
        set(&mut user.first_name, self.first_name);
        set(&mut user.last_name, self.last_name);
        set(&mut user.phone_number, self.phone_number);
        set(&mut user.user_type, self.resolved_user_type);
    }
}
