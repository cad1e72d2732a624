//! API service routes

use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{middleware::auth_middleware, state::AppState};

pub mod auth;
pub mod users;

/// Create the router for the user service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/users/me", get(users::current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(auth::login))
        .route("/users", get(users::search_users))
        .route("/users/signup", post(users::add_user))
        .route(
            "/users/:user_id",
            get(users::get_user).put(users::update_user),
        )
        .route("/users/:user_id/matches", get(users::get_user_matches))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "giftr-api"
    }))
}
