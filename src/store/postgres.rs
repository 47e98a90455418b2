use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{generate_passenger_id, ProfileStore, StoreError};
use crate::passengers::{repo as passenger_repo, repo_types::Passenger};
use crate::riders::{repo as rider_repo, repo_types::Rider};
use crate::users::{
    repo as user_repo,
    repo_types::{NewUser, User, UserType},
};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn internal(e: sqlx::Error, what: &'static str) -> StoreError {
    StoreError::Internal(anyhow::Error::new(e).context(what))
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        user_repo::find_by_email(&self.db, email)
            .await
            .map_err(|e| internal(e, "find user by email"))
    }

    async fn get_user(&self, id: Uuid) -> Result<User, StoreError> {
        user_repo::get_by_id(&self.db, id)
            .await
            .map_err(|e| internal(e, "get user"))?
            .ok_or(StoreError::NotFound)
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        let user = match user_repo::insert_tx(&mut tx, &new).await {
            Ok(u) => u,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(StoreError::EmailTaken)
            }
            Err(e) => return Err(internal(e, "insert user")),
        };

        match user.user_type {
            UserType::Passenger => {
                let p = passenger_repo::insert_tx(&mut tx, user.id, &generate_passenger_id())
                    .await
                    .map_err(|e| internal(e, "insert passenger"))?;
                debug!(user_id = %user.id, passenger_id = %p.passenger_id, "passenger profile provisioned");
            }
            UserType::Rider => {
                let r = rider_repo::insert_tx(&mut tx, user.id)
                    .await
                    .map_err(|e| internal(e, "insert rider"))?;
                debug!(user_id = %user.id, rider_id = %r.id, "rider profile provisioned");
            }
        }

        tx.commit().await.context("commit tx")?;
        Ok(user)
    }

    async fn update_user(&self, user: &User) -> Result<User, StoreError> {
        match user_repo::update(&self.db, user).await {
            Ok(Some(u)) => Ok(u),
            Ok(None) => Err(StoreError::NotFound),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::EmailTaken)
            }
            Err(e) => Err(internal(e, "update user")),
        }
    }

    async fn get_passenger(&self, id: Uuid) -> Result<Passenger, StoreError> {
        passenger_repo::get_by_id(&self.db, id)
            .await
            .map_err(|e| internal(e, "get passenger"))?
            .ok_or(StoreError::NotFound)
    }

    async fn update_passenger(&self, passenger: &Passenger) -> Result<Passenger, StoreError> {
        passenger_repo::update(&self.db, passenger)
            .await
            .map_err(|e| internal(e, "update passenger"))?
            .ok_or(StoreError::NotFound)
    }

    async fn get_rider(&self, id: Uuid) -> Result<Rider, StoreError> {
        rider_repo::get_by_id(&self.db, id)
            .await
            .map_err(|e| internal(e, "get rider"))?
            .ok_or(StoreError::NotFound)
    }

    async fn update_rider(&self, rider: &Rider) -> Result<Rider, StoreError> {
        rider_repo::update(&self.db, rider)
            .await
            .map_err(|e| internal(e, "update rider"))?
            .ok_or(StoreError::NotFound)
    }
}
