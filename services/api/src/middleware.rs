//! Authentication middleware for bearer token validation

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::warn;

use crate::{auth::Principal, error::ApiError, state::AppState};

/// Resolve the caller from `Authorization: Bearer <token>` and store a
/// [`Principal`] in the request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;

    let claims = state
        .jwt_service
        .validate_token(bearer.token())
        .map_err(|e| {
            warn!("Rejected bearer token: {}", e);
            ApiError::Unauthorized
        })?;

    req.extensions_mut().insert(Principal {
        username: claims.sub,
    });

    Ok(next.run(req).await)
}
