use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::riders::repo_types::Rider;

const RIDER_COLUMNS: &str = "id, user_id, profile_picture, license_number, license_picture, \
    id_number_picture, verification_status, verification_notes, is_available, \
    current_latitude, current_longitude, average_rating, created_at, updated_at";

/// Insert the default rider profile for a freshly created user.
pub async fn insert_tx(tx: &mut Transaction<'_, Postgres>, user_id: Uuid) -> sqlx::Result<Rider> {
    sqlx::query_as::<_, Rider>(&format!(
        r#"
        INSERT INTO riders (id, user_id)
        VALUES ($1, $2)
        RETURNING {RIDER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await
}

pub async fn get_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Rider>> {
    sqlx::query_as::<_, Rider>(&format!("SELECT {RIDER_COLUMNS} FROM riders WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Write the read-write columns and bump `updated_at`. Verification state and
/// rating are left to back-office jobs.
pub async fn update(db: &PgPool, r: &Rider) -> sqlx::Result<Option<Rider>> {
    sqlx::query_as::<_, Rider>(&format!(
        r#"
        UPDATE riders
           SET profile_picture = $2,
               license_number = $3,
               license_picture = $4,
               id_number_picture = $5,
               is_available = $6,
               current_latitude = $7,
               current_longitude = $8,
               updated_at = now()
         WHERE id = $1
        RETURNING {RIDER_COLUMNS}
        "#
    ))
    .bind(r.id)
    .bind(&r.profile_picture)
    .bind(&r.license_number)
    .bind(&r.license_picture)
    .bind(&r.id_number_picture)
    .bind(r.is_available)
    .bind(r.current_latitude)
    .bind(r.current_longitude)
    .fetch_optional(db)
    .await
}
