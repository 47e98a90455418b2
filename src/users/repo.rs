use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::users::repo_types::{NewUser, User};

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, phone_number, user_type, date_joined";

/// Find a user by (normalised) email.
pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(db)
        .await
}

pub async fn get_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Insert a user within a transaction. A duplicate email fails with a unique violation.
pub async fn insert_tx(tx: &mut Transaction<'_, Postgres>, new: &NewUser) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, email, password_hash, first_name, last_name, phone_number, user_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.email)
    .bind(&new.password_hash)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.phone_number)
    .bind(new.user_type)
    .fetch_one(&mut **tx)
    .await
}

/// Write the read-write columns; `id`, `password_hash` and `date_joined` are untouched.
pub async fn update(db: &PgPool, user: &User) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
           SET email = $2, first_name = $3, last_name = $4, phone_number = $5, user_type = $6
         WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.phone_number)
    .bind(user.user_type)
    .fetch_optional(db)
    .await
}
