use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{generate_passenger_id, ProfileStore, StoreError};
use crate::passengers::repo_types::Passenger;
use crate::riders::repo_types::{Rider, VerificationStatus};
use crate::users::repo_types::{NewUser, User, UserType};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    passengers: HashMap<Uuid, Passenger>,
    riders: HashMap<Uuid, Rider>,
}

/// Process-local store with the same contract as the Postgres one.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Internal(anyhow::anyhow!("memory store lock poisoned")))
    }

    #[cfg(test)]
    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    #[cfg(test)]
    pub fn passenger_for_user(&self, user_id: Uuid) -> Option<Passenger> {
        let t = self.tables.lock().unwrap();
        t.passengers.values().find(|p| p.user_id == user_id).cloned()
    }

    #[cfg(test)]
    pub fn rider_for_user(&self, user_id: Uuid) -> Option<Rider> {
        let t = self.tables.lock().unwrap();
        t.riders.values().find(|r| r.user_id == user_id).cloned()
    }

    /// Overwrites a stored rider wholesale, system-managed fields included.
    #[cfg(test)]
    pub fn put_rider(&self, rider: Rider) {
        self.tables.lock().unwrap().riders.insert(rider.id, rider);
    }

    #[cfg(test)]
    pub fn put_passenger(&self, passenger: Passenger) {
        self.tables.lock().unwrap().passengers.insert(passenger.id, passenger);
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let t = self.lock()?;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn get_user(&self, id: Uuid) -> Result<User, StoreError> {
        self.lock()?.users.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut t = self.lock()?;
        if t.users.values().any(|u| u.email == new.email) {
            return Err(StoreError::EmailTaken);
        }

        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            first_name: new.first_name,
            last_name: new.last_name,
            phone_number: new.phone_number,
            user_type: new.user_type,
            date_joined: now,
        };

        match user.user_type {
            UserType::Passenger => {
                let p = Passenger {
                    id: Uuid::new_v4(),
                    user_id: user.id,
                    passenger_id: generate_passenger_id(),
                    preferred_payment_method: Passenger::DEFAULT_PAYMENT_METHOD.to_string(),
                    home_address: None,
                    profile_picture: None,
                    preferred_language: Passenger::DEFAULT_LANGUAGE.to_string(),
                    emergency_contact: None,
                    is_verified: false,
                    created_at: now,
                    updated_at: now,
                };
                t.passengers.insert(p.id, p);
            }
            UserType::Rider => {
                let r = Rider {
                    id: Uuid::new_v4(),
                    user_id: user.id,
                    profile_picture: None,
                    license_number: None,
                    license_picture: None,
                    id_number_picture: None,
                    verification_status: VerificationStatus::Pending,
                    verification_notes: None,
                    is_available: false,
                    current_latitude: None,
                    current_longitude: None,
                    average_rating: 0.0,
                    created_at: now,
                    updated_at: now,
                };
                t.riders.insert(r.id, r);
            }
        }

        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: &User) -> Result<User, StoreError> {
        let mut t = self.lock()?;
        if t
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(StoreError::EmailTaken);
        }
        let stored = t.users.get_mut(&user.id).ok_or(StoreError::NotFound)?;
        stored.email = user.email.clone();
        stored.first_name = user.first_name.clone();
        stored.last_name = user.last_name.clone();
        stored.phone_number = user.phone_number.clone();
        stored.user_type = user.user_type;
        Ok(stored.clone())
    }

    async fn get_passenger(&self, id: Uuid) -> Result<Passenger, StoreError> {
        self.lock()?
            .passengers
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_passenger(&self, passenger: &Passenger) -> Result<Passenger, StoreError> {
        let mut t = self.lock()?;
        let stored = t.passengers.get_mut(&passenger.id).ok_or(StoreError::NotFound)?;
        stored.preferred_payment_method = passenger.preferred_payment_method.clone();
        stored.home_address = passenger.home_address.clone();
        stored.profile_picture = passenger.profile_picture.clone();
        stored.preferred_language = passenger.preferred_language.clone();
        stored.emergency_contact = passenger.emergency_contact.clone();
        stored.updated_at = OffsetDateTime::now_utc();
        Ok(stored.clone())
    }

    async fn get_rider(&self, id: Uuid) -> Result<Rider, StoreError> {
        self.lock()?.riders.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update_rider(&self, rider: &Rider) -> Result<Rider, StoreError> {
        let mut t = self.lock()?;
        let stored = t.riders.get_mut(&rider.id).ok_or(StoreError::NotFound)?;
        stored.profile_picture = rider.profile_picture.clone();
        stored.license_number = rider.license_number.clone();
        stored.license_picture = rider.license_picture.clone();
        stored.id_number_picture = rider.id_number_picture.clone();
        stored.is_available = rider.is_available;
        stored.current_latitude = rider.current_latitude;
        stored.current_longitude = rider.current_longitude;
        stored.updated_at = OffsetDateTime::now_utc();
        Ok(stored.clone())
    }
}
