//! Store interfaces for users, matches and credentials
//!
//! Handlers only see these traits. `main` picks the Postgres repositories or
//! the in-memory stores and injects them through [`crate::state::AppState`].

use async_trait::async_trait;
use common::error::DatabaseResult;

use crate::models::{AuthenticationPair, Match, NewUser, User, UserFilter, UserPatch};

pub mod credentials;
pub mod matches;
pub mod memory;
pub mod user;

pub use credentials::CredentialRepository;
pub use matches::MatchRepository;
pub use memory::{MemoryCredentialStore, MemoryMatchStore, MemoryUserStore};
pub use user::UserRepository;

/// User persistence and search
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. `None` when no id could be produced (e.g. taken username).
    async fn insert(&self, new_user: &NewUser) -> DatabaseResult<Option<i32>>;

    /// Find a user by id
    async fn get(&self, id: i32) -> DatabaseResult<Option<User>>;

    /// Find a user by username
    async fn get_by_username(&self, username: &str) -> DatabaseResult<Option<User>>;

    /// Write the set fields of `patch` to user `id`, leaving the others as stored
    async fn update(&self, id: i32, patch: &UserPatch) -> DatabaseResult<()>;

    /// Users matching `filter`, ordered by id
    async fn search(&self, filter: &UserFilter) -> DatabaseResult<Vec<User>>;
}

/// Read access to computed matches
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Every match in which `user_id` takes part
    async fn find_by_user(&self, user_id: i32) -> DatabaseResult<Vec<Match>>;
}

/// Credential pair storage keyed by username
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new pair
    async fn insert_pair(&self, pair: &AuthenticationPair) -> DatabaseResult<()>;

    /// Insert or replace the pair for `pair.username`
    async fn update_pair(&self, pair: &AuthenticationPair) -> DatabaseResult<()>;

    /// Re-key a pair. Returns false when `old_username` had none.
    async fn rename_pair(&self, old_username: &str, new_username: &str) -> DatabaseResult<bool>;

    /// Find the pair for `username`
    async fn find_pair(&self, username: &str) -> DatabaseResult<Option<AuthenticationPair>>;
}
