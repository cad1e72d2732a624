//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    auth::JwtService,
    repositories::{
        CredentialRepository, CredentialStore, MatchRepository, MatchStore, MemoryCredentialStore,
        MemoryMatchStore, MemoryUserStore, UserRepository, UserStore,
    },
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_store: Arc<dyn UserStore>,
    pub match_store: Arc<dyn MatchStore>,
    pub credential_store: Arc<dyn CredentialStore>,
    pub jwt_service: JwtService,
}

impl AppState {
    /// State backed by the Postgres repositories
    pub fn postgres(pool: PgPool, jwt_service: JwtService) -> Self {
        Self {
            user_store: Arc::new(UserRepository::new(pool.clone())),
            match_store: Arc::new(MatchRepository::new(pool.clone())),
            credential_store: Arc::new(CredentialRepository::new(pool)),
            jwt_service,
        }
    }

    /// State backed by empty in-memory stores
    pub fn in_memory(jwt_service: JwtService) -> Self {
        Self {
            user_store: Arc::new(MemoryUserStore::new()),
            match_store: Arc::new(MemoryMatchStore::new()),
            credential_store: Arc::new(MemoryCredentialStore::new()),
            jwt_service,
        }
    }
}
