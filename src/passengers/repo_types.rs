use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Passenger profile row. Owned by exactly one user.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Passenger {
    pub id: Uuid,
    pub user_id: Uuid,
    pub passenger_id: String, // generated on insert, never changes
    pub preferred_payment_method: String,
    pub home_address: Option<String>,
    pub profile_picture: Option<String>,
    pub preferred_language: String,
    pub emergency_contact: Option<String>,
    pub is_verified: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Passenger {
    pub const DEFAULT_PAYMENT_METHOD: &'static str = "cash";
    pub const DEFAULT_LANGUAGE: &'static str = "en";
}
