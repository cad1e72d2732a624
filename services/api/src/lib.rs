//! Giftr user service
//!
//! REST endpoints for user search, signup, lookup, update and match listing,
//! backed by pluggable user, match and credential stores.

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use config::Config;
pub use state::AppState;
