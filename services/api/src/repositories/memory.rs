//! In-memory stores
//!
//! Same observable behaviour as the Postgres repositories, without a database.
//! Used by the `memory` storage backend and by the test suite.

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{CredentialStore, MatchStore, UserStore};
use crate::models::{AuthenticationPair, Match, NewUser, User, UserFilter, UserPatch};

#[derive(Default)]
struct UserTable {
    last_id: i32,
    rows: BTreeMap<i32, User>,
}

impl UserTable {
    fn username_taken(&self, username: Option<&str>, except_id: Option<i32>) -> bool {
        let Some(username) = username else {
            return false;
        };
        self.rows
            .values()
            .any(|user| user.username.as_deref() == Some(username) && Some(user.id) != except_id)
    }
}

/// In-memory user store
#[derive(Default)]
pub struct MemoryUserStore {
    table: RwLock<UserTable>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, new_user: &NewUser) -> DatabaseResult<Option<i32>> {
        let mut table = self.table.write().await;

        if table.username_taken(new_user.username.as_deref(), None) {
            warn!("User insert rejected: username {:?} taken", new_user.username);
            return Ok(None);
        }

        table.last_id += 1;
        let id = table.last_id;
        let now = Utc::now();
        table.rows.insert(
            id,
            User {
                id,
                username: new_user.username.clone(),
                status: new_user.status,
                gender: new_user.gender,
                location: new_user.location.clone(),
                gift_type: new_user.gift_type,
                interests: new_user.interests.clone(),
                price_min: new_user.price_min,
                price_max: new_user.price_max,
                signup_date: now,
                last_updated: now,
            },
        );

        debug!("Inserted user {}", id);
        Ok(Some(id))
    }

    async fn get(&self, id: i32) -> DatabaseResult<Option<User>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|user| user.username.as_deref() == Some(username))
            .cloned())
    }

    async fn update(&self, id: i32, patch: &UserPatch) -> DatabaseResult<()> {
        let mut table = self.table.write().await;

        let Some(mut user) = table.rows.get(&id).cloned() else {
            return Ok(());
        };
        patch.apply(&mut user);

        if table.username_taken(user.username.as_deref(), Some(id)) {
            return Err(DatabaseError::UniqueViolation(
                "users_username_key".to_string(),
            ));
        }

        user.last_updated = Utc::now();
        table.rows.insert(id, user);
        Ok(())
    }

    async fn search(&self, filter: &UserFilter) -> DatabaseResult<Vec<User>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect())
    }
}

/// In-memory match store
#[derive(Default)]
pub struct MemoryMatchStore {
    matches: RwLock<Vec<Match>>,
}

impl MemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a match between two users, as the external matcher would
    pub async fn record(&self, user1_id: i32, user2_id: i32) -> Match {
        let mut matches = self.matches.write().await;
        let new_match = Match {
            id: matches.len() as i32 + 1,
            user1_id,
            user2_id,
            created_at: Utc::now(),
        };
        matches.push(new_match.clone());
        new_match
    }
}

#[async_trait]
impl MatchStore for MemoryMatchStore {
    async fn find_by_user(&self, user_id: i32) -> DatabaseResult<Vec<Match>> {
        let matches = self.matches.read().await;
        Ok(matches
            .iter()
            .filter(|m| m.involves(user_id))
            .cloned()
            .collect())
    }
}

/// In-memory credential store
#[derive(Default)]
pub struct MemoryCredentialStore {
    pairs: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn insert_pair(&self, pair: &AuthenticationPair) -> DatabaseResult<()> {
        let mut pairs = self.pairs.write().await;
        if pairs.contains_key(&pair.username) {
            return Err(DatabaseError::UniqueViolation(
                "authentication_pairs_pkey".to_string(),
            ));
        }
        pairs.insert(pair.username.clone(), pair.password_hash.clone());
        Ok(())
    }

    async fn update_pair(&self, pair: &AuthenticationPair) -> DatabaseResult<()> {
        self.pairs
            .write()
            .await
            .insert(pair.username.clone(), pair.password_hash.clone());
        Ok(())
    }

    async fn rename_pair(&self, old_username: &str, new_username: &str) -> DatabaseResult<bool> {
        let mut pairs = self.pairs.write().await;
        if pairs.contains_key(new_username) {
            return Err(DatabaseError::UniqueViolation(
                "authentication_pairs_pkey".to_string(),
            ));
        }
        match pairs.remove(old_username) {
            Some(hash) => {
                pairs.insert(new_username.to_string(), hash);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_pair(&self, username: &str) -> DatabaseResult<Option<AuthenticationPair>> {
        let pairs = self.pairs.read().await;
        Ok(pairs.get(username).map(|hash| AuthenticationPair {
            username: username.to_string(),
            password_hash: hash.clone(),
        }))
    }
}
