use std::sync::Arc;

use anyhow::Context;

use crate::config::AppConfig;
use crate::store::{MemoryStore, PgStore, ProfileStore};
use crate::users::password::{Argon2Hasher, CredentialHasher};
use crate::users::policy::{DefaultPasswordPolicy, PasswordPolicy};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ProfileStore>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub policy: Arc<dyn PasswordPolicy>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match &config.database_url {
            Some(url) => {
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .connect(url)
                    .await
                    .context("connect to database")?;

                if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }
                Arc::new(PgStore::new(db)) as Arc<dyn ProfileStore>
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store");
                Arc::new(MemoryStore::new()) as Arc<dyn ProfileStore>
            }
        };

        let policy = Arc::new(DefaultPasswordPolicy {
            min_length: config.password_policy.min_length,
        }) as Arc<dyn PasswordPolicy>;

        Ok(Self::from_parts(config, store, Arc::new(Argon2Hasher), policy))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn ProfileStore>,
        hasher: Arc<dyn CredentialHasher>,
        policy: Arc<dyn PasswordPolicy>,
    ) -> Self {
        Self {
            config,
            store,
            hasher,
            policy,
        }
    }

    /// State over a fresh in-memory store, also returned for direct inspection.
    #[cfg(test)]
    pub fn fake() -> (Self, Arc<MemoryStore>) {
        let config = Arc::new(
            AppConfig::from_lookup(|_| None).expect("default config is valid"),
        );
        let store = Arc::new(MemoryStore::new());
        let state = Self::from_parts(
            config,
            store.clone(),
            Arc::new(Argon2Hasher),
            Arc::new(DefaultPasswordPolicy::default()),
        );
        (state, store)
    }
}
