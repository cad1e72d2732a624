//! Login endpoint issuing bearer tokens

use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::WithRejection;
use tracing::{error, info};

use crate::{
    AppState, auth,
    error::{ApiError, ApiResult},
    models::{LoginRequest, TokenResponse},
};

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    info!("Login attempt for user: {}", payload.username);

    let verified = match state.credential_store.find_pair(&payload.username).await? {
        Some(pair) => auth::verify_password(&pair.password_hash, &payload.password)?,
        None => false,
    };

    if !verified {
        return Err(ApiError::Unauthorized);
    }

    let access_token = state
        .jwt_service
        .issue_token(&payload.username)
        .map_err(|e| {
            error!("Failed to generate access token: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.token_expiry(),
    }))
}
