use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::passengers::repo_types::Passenger;

const PASSENGER_COLUMNS: &str = "id, user_id, passenger_id, preferred_payment_method, \
    home_address, profile_picture, preferred_language, emergency_contact, is_verified, \
    created_at, updated_at";

/// Insert the default passenger profile for a freshly created user.
pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    passenger_id: &str,
) -> sqlx::Result<Passenger> {
    sqlx::query_as::<_, Passenger>(&format!(
        r#"
        INSERT INTO passengers (id, user_id, passenger_id)
        VALUES ($1, $2, $3)
        RETURNING {PASSENGER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(passenger_id)
    .fetch_one(&mut **tx)
    .await
}

pub async fn get_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Passenger>> {
    sqlx::query_as::<_, Passenger>(&format!(
        "SELECT {PASSENGER_COLUMNS} FROM passengers WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Write the read-write columns and bump `updated_at`.
pub async fn update(db: &PgPool, p: &Passenger) -> sqlx::Result<Option<Passenger>> {
    sqlx::query_as::<_, Passenger>(&format!(
        r#"
        UPDATE passengers
           SET preferred_payment_method = $2,
               home_address = $3,
               profile_picture = $4,
               preferred_language = $5,
               emergency_contact = $6,
               updated_at = now()
         WHERE id = $1
        RETURNING {PASSENGER_COLUMNS}
        "#
    ))
    .bind(p.id)
    .bind(&p.preferred_payment_method)
    .bind(&p.home_address)
    .bind(&p.profile_picture)
    .bind(&p.preferred_language)
    .bind(&p.emergency_contact)
    .fetch_optional(db)
    .await
}
