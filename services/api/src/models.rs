//! API models for request and response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

pub mod filter;
pub mod patch;
pub mod user;

pub use filter::UserFilter;
pub use patch::{Patch, UserPatch};
pub use user::{Gender, GiftType, NewUser, SignupParams, User, UserDetail, UserStatus, UserSummary};

/// A match between two users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i32,
    pub user1_id: i32,
    pub user2_id: i32,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn involves(&self, user_id: i32) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }
}

/// Stored credential pair. Holds the Argon2 hash, never the password.
#[derive(Clone, PartialEq, FromRow)]
pub struct AuthenticationPair {
    pub username: String,
    pub password_hash: String,
}

impl fmt::Debug for AuthenticationPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationPair")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for token generation
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}
