use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Which profile a user carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_type", rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Passenger,
    Rider,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Passenger => "passenger",
            UserType::Rider => "rider",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passenger" => Ok(UserType::Passenger),
            "rider" => Ok(UserType::Rider),
            other => Err(format!("\"{}\" is not a valid choice.", other)),
        }
    }
}

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String, // argon2 PHC string, never projected
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub user_type: UserType,
    pub date_joined: OffsetDateTime,
}

/// Values for a user insert. Carries the hash only; plaintext never reaches the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub user_type: UserType,
}
