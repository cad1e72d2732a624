//! Partial update values for user records

use serde::{Deserialize, Deserializer};

use super::user::{Gender, GiftType, User, UserStatus};

/// A single field of a partial update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the stored value untouched
    Unset,
    /// Replace the stored value
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unset
    }
}

impl<T> Patch<T> {
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Unset => None,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    fn apply_to(&self, target: &mut T)
    where
        T: Clone,
    {
        if let Patch::Set(value) = self {
            *target = value.clone();
        }
    }
}

impl Patch<String> {
    /// New value of an optional text column, if set. An empty value clears it.
    pub fn as_optional_text(&self) -> Option<Option<&str>> {
        self.as_set()
            .map(|value| if value.is_empty() { None } else { Some(value.as_str()) })
    }

    fn apply_to_optional(&self, target: &mut Option<String>) {
        if let Some(value) = self.as_optional_text() {
            *target = value.map(str::to_string);
        }
    }
}

// A present parameter is always `Set`; absence comes from `#[serde(default)]`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Patch::Set)
    }
}

/// Query parameters accepted by the user update endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPatch {
    pub username: Patch<String>,
    pub status: Patch<UserStatus>,
    pub gender: Patch<Gender>,
    pub location: Patch<String>,
    pub gift_type: Patch<GiftType>,
    pub interests: Patch<String>,
    pub price_min: Patch<i32>,
    pub price_max: Patch<i32>,
    pub password: Option<String>,
}

impl UserPatch {
    /// Merge the set fields into `user`. The id is never touched.
    pub fn apply(&self, user: &mut User) {
        self.username.apply_to_optional(&mut user.username);
        self.status.apply_to(&mut user.status);
        self.gender.apply_to(&mut user.gender);
        self.location.apply_to_optional(&mut user.location);
        self.gift_type.apply_to(&mut user.gift_type);
        self.interests.apply_to_optional(&mut user.interests);
        self.price_min.apply_to(&mut user.price_min);
        self.price_max.apply_to(&mut user.price_max);
    }
}
