//! Persistence capability for users and their passenger/rider profiles.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::passengers::repo_types::Passenger;
use crate::riders::repo_types::Rider;
use crate::users::repo_types::{NewUser, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("email already registered")]
    EmailTaken,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Record storage. Implementations enforce email uniqueness and own the
/// system-managed fields (`id`, `passenger_id`, timestamps).
///
/// `create_user` also provisions the single profile matching the user's
/// type, so every user has exactly one passenger or rider row from birth.
/// `update_*` write only the read-write columns of the given record and
/// return the stored result with `updated_at` refreshed.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn get_user(&self, id: Uuid) -> Result<User, StoreError>;
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;
    async fn update_user(&self, user: &User) -> Result<User, StoreError>;

    async fn get_passenger(&self, id: Uuid) -> Result<Passenger, StoreError>;
    async fn update_passenger(&self, passenger: &Passenger) -> Result<Passenger, StoreError>;

    async fn get_rider(&self, id: Uuid) -> Result<Rider, StoreError>;
    async fn update_rider(&self, rider: &Rider) -> Result<Rider, StoreError>;
}

/// Human-readable passenger identifier, e.g. `PSG-3F9A01BC`.
pub fn generate_passenger_id() -> String {
    use rand::Rng;
    let n: u32 = rand::thread_rng().gen();
    format!("PSG-{:08X}", n)
}
