//! Search criteria for the user search endpoint

use serde::Deserialize;

use super::user::{Gender, GiftType, User};

/// Immutable user search criteria. An absent field does not filter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    /// Exact username
    pub username: Option<String>,
    pub gender: Option<Gender>,
    /// Case-insensitive substring of the location
    pub location: Option<String>,
    pub gift_type: Option<GiftType>,
    /// Case-insensitive substring of the interests
    pub interests: Option<String>,
    /// Keep users whose upper price bound reaches this value
    pub price_min: Option<i32>,
    /// Keep users whose lower price bound stays within this value
    pub price_max: Option<i32>,
}

impl UserFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `user` satisfies every criterion. Deleted users never match.
    pub fn matches(&self, user: &User) -> bool {
        if user.status.is_deleted() {
            return false;
        }

        if let Some(username) = &self.username {
            if user.username.as_deref() != Some(username.as_str()) {
                return false;
            }
        }

        if self.gender.is_some_and(|gender| gender != user.gender) {
            return false;
        }

        if self.gift_type.is_some_and(|gift_type| gift_type != user.gift_type) {
            return false;
        }

        if !contains_ignore_case(user.location.as_deref(), self.location.as_deref()) {
            return false;
        }

        if !contains_ignore_case(user.interests.as_deref(), self.interests.as_deref()) {
            return false;
        }

        if self.price_min.is_some_and(|min| user.price_max < min) {
            return false;
        }

        if self.price_max.is_some_and(|max| user.price_min > max) {
            return false;
        }

        true
    }
}

fn contains_ignore_case(haystack: Option<&str>, needle: Option<&str>) -> bool {
    match (haystack, needle) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(haystack), Some(needle)) => haystack
            .to_lowercase()
            .contains(&needle.to_lowercase()),
    }
}
