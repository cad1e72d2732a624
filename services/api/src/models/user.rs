//! User model, code types and the JSON views served by the user endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

macro_rules! code_type {
    ($(#[$meta:meta])* $name:ident, default = $default:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(pub i32);

        impl Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }

        impl From<i32> for $name {
            fn from(code: i32) -> Self {
                Self(code)
            }
        }
    };
}

code_type!(
    /// Account status code
    UserStatus,
    default = 1
);

code_type!(
    /// Gender code
    Gender,
    default = 1
);

code_type!(
    /// Preferred gift category code
    GiftType,
    default = 1
);

impl UserStatus {
    pub const DELETED: UserStatus = UserStatus(0);
    pub const ACTIVE: UserStatus = UserStatus(1);
    pub const INACTIVE: UserStatus = UserStatus(2);

    pub fn is_deleted(self) -> bool {
        self == Self::DELETED
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: i32,
    pub username: Option<String>,
    pub status: UserStatus,
    pub gender: Gender,
    pub location: Option<String>,
    pub gift_type: GiftType,
    pub interests: Option<String>,
    pub price_min: i32,
    pub price_max: i32,
    pub signup_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// New user creation payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: Option<String>,
    pub status: UserStatus,
    pub gender: Gender,
    pub location: Option<String>,
    pub gift_type: GiftType,
    pub interests: Option<String>,
    pub price_min: i32,
    pub price_max: i32,
}

/// Summary projection, used by search results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub username: Option<String>,
    pub gender: Gender,
    pub location: Option<String>,
    pub gift_type: GiftType,
    pub interests: Option<String>,
    pub price_min: i32,
    pub price_max: i32,
}

/// Detailed projection, returned for a single user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    pub id: i32,
    pub username: Option<String>,
    pub status: UserStatus,
    pub gender: Gender,
    pub location: Option<String>,
    pub gift_type: GiftType,
    pub interests: Option<String>,
    pub price_min: i32,
    pub price_max: i32,
    pub signup_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            gender: user.gender,
            location: user.location.clone(),
            gift_type: user.gift_type,
            interests: user.interests.clone(),
            price_min: user.price_min,
            price_max: user.price_max,
        }
    }
}

impl From<User> for UserDetail {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            status: user.status,
            gender: user.gender,
            location: user.location,
            gift_type: user.gift_type,
            interests: user.interests,
            price_min: user.price_min,
            price_max: user.price_max,
            signup_date: user.signup_date,
            last_updated: user.last_updated,
        }
    }
}

/// Query parameters accepted by signup, with server-side defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupParams {
    pub username: Option<String>,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub gender: Gender,
    pub location: Option<String>,
    #[serde(default)]
    pub gift_type: GiftType,
    pub interests: Option<String>,
    #[serde(default)]
    pub price_min: i32,
    #[serde(default)]
    pub price_max: i32,
    pub password: Option<String>,
}

impl SignupParams {
    /// Split into the user to insert and the optional password
    pub fn into_parts(self) -> (NewUser, Option<String>) {
        let user = NewUser {
            username: self.username,
            status: self.status,
            gender: self.gender,
            location: self.location,
            gift_type: self.gift_type,
            interests: self.interests,
            price_min: self.price_min,
            price_max: self.price_max,
        };
        (user, self.password)
    }
}
