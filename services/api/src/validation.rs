//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::{
    error::ApiError,
    models::{Patch, SignupParams, UserFilter, UserPatch},
};

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a price bound
pub fn validate_price(name: &str, value: i32) -> Result<(), String> {
    if value < 0 {
        return Err(format!("{} must not be negative", name));
    }

    Ok(())
}

/// Validate signup parameters
pub fn validate_signup(params: &SignupParams) -> Result<(), ApiError> {
    check(params.username.as_deref(), validate_username)?;
    check(params.password.as_deref(), validate_password)?;
    validate_price("priceMin", params.price_min).map_err(ApiError::BadRequest)?;
    validate_price("priceMax", params.price_max).map_err(ApiError::BadRequest)?;
    Ok(())
}

/// Validate update parameters
pub fn validate_patch(patch: &UserPatch) -> Result<(), ApiError> {
    if let Patch::Set(username) = &patch.username {
        validate_username(username).map_err(ApiError::BadRequest)?;
    }
    check(patch.password.as_deref(), validate_password)?;
    if let Patch::Set(price_min) = patch.price_min {
        validate_price("priceMin", price_min).map_err(ApiError::BadRequest)?;
    }
    if let Patch::Set(price_max) = patch.price_max {
        validate_price("priceMax", price_max).map_err(ApiError::BadRequest)?;
    }
    Ok(())
}

/// Validate search criteria
pub fn validate_filter(filter: &UserFilter) -> Result<(), ApiError> {
    if let Some(price_min) = filter.price_min {
        validate_price("priceMin", price_min).map_err(ApiError::BadRequest)?;
    }
    if let Some(price_max) = filter.price_max {
        validate_price("priceMax", price_max).map_err(ApiError::BadRequest)?;
    }
    Ok(())
}

fn check(value: Option<&str>, rule: fn(&str) -> Result<(), String>) -> Result<(), ApiError> {
    match value {
        Some(value) => rule(value).map_err(ApiError::BadRequest),
        None => Ok(()),
    }
}
