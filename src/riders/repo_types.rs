use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Review state of a rider's documents. Set by back-office review only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "verification_status", rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Rider profile row. Owned by exactly one user.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Rider {
    pub id: Uuid,
    pub user_id: Uuid,
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
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
