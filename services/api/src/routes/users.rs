//! User endpoints: search, signup, lookup, update and match listing

use axum::{
    Extension, Json,
    extract::{OriginalUri, Path, Query, State},
    http::{StatusCode, Uri, header},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::{debug, info, warn};

use crate::{
    AppState, auth,
    auth::Principal,
    error::{ApiError, ApiResult},
    models::{SignupParams, User, UserDetail, UserFilter, UserPatch, UserSummary},
    validation,
};

/// Canonical URI of the current request, echoed in `Location`
fn request_location(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// Load a user or fail with `UserNotFound`
async fn ensure_user_exists(state: &AppState, user_id: i32) -> ApiResult<User> {
    state
        .user_store
        .get(user_id)
        .await?
        .ok_or(ApiError::UserNotFound(user_id))
}

/// Advanced search for users. Without parameters, returns every user that is
/// not deleted.
pub async fn search_users(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    WithRejection(Query(filter), _): WithRejection<Query<UserFilter>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_filter(&filter)?;
    if filter.is_empty() {
        debug!("Listing every non-deleted user");
    }

    let users = state.user_store.search(&filter).await?;
    let summaries: Vec<UserSummary> = users.iter().map(UserSummary::from).collect();

    Ok((
        StatusCode::OK,
        [(header::LOCATION, request_location(&uri))],
        Json(summaries),
    ))
}

/// Create a new user
pub async fn add_user(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    WithRejection(Query(params), _): WithRejection<Query<SignupParams>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_signup(&params)?;
    let (new_user, password) = params.into_parts();

    let user_id = state.user_store.insert(&new_user).await?.ok_or_else(|| {
        warn!("User store produced no id for {:?}", new_user.username);
        ApiError::UserCreationFailed
    })?;
    info!("Created user {}", user_id);

    if let (Some(username), Some(password)) = (new_user.username.as_deref(), password.as_deref()) {
        let pair = auth::hash_pair(username, password)?;
        state.credential_store.insert_pair(&pair).await?;
    }

    let user = ensure_user_exists(&state, user_id).await?;

    let location = format!("{}/{}", uri.path().trim_end_matches("/signup"), user_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserDetail::from(user)),
    ))
}

/// Returns the specified user
pub async fn get_user(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    WithRejection(Path(user_id), _): WithRejection<Path<i32>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let user = ensure_user_exists(&state, user_id).await?;

    Ok((
        StatusCode::OK,
        [(header::LOCATION, request_location(&uri))],
        Json(UserDetail::from(user)),
    ))
}

/// Returns the authenticated caller's user record
pub async fn current_user(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Extension(principal): Extension<Principal>,
) -> ApiResult<impl IntoResponse> {
    let username = principal.username;
    let user = state
        .user_store
        .get_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::UnknownPrincipal(username.clone()))?;

    Ok((
        StatusCode::OK,
        [(header::LOCATION, request_location(&uri))],
        Json(UserDetail::from(user)),
    ))
}

/// Updates the specified user. Only supplied fields change.
pub async fn update_user(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    WithRejection(Path(user_id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Query(mut patch), _): WithRejection<Query<UserPatch>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let previous_username = ensure_user_exists(&state, user_id).await?.username;
    validation::validate_patch(&patch)?;

    let password = patch.password.take();
    state.user_store.update(user_id, &patch).await?;
    let user = ensure_user_exists(&state, user_id).await?;
    info!("Updated user {}", user_id);

    if let (Some(old), Some(new)) = (previous_username.as_deref(), user.username.as_deref()) {
        if old != new && state.credential_store.rename_pair(old, new).await? {
            info!("Moved credentials of user {} to new username", user_id);
        }
    }

    if let (Some(username), Some(password)) = (patch.username.as_set(), password.as_deref()) {
        let pair = auth::hash_pair(username, password)?;
        state.credential_store.update_pair(&pair).await?;
    }

    Ok((
        StatusCode::OK,
        [(header::LOCATION, request_location(&uri))],
        Json(UserDetail::from(user)),
    ))
}

/// Returns matches involving the specified user
pub async fn get_user_matches(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    WithRejection(Path(user_id), _): WithRejection<Path<i32>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    ensure_user_exists(&state, user_id).await?;

    let matches = state.match_store.find_by_user(user_id).await?;

    Ok((
        StatusCode::OK,
        [(header::LOCATION, request_location(&uri))],
        Json(matches),
    ))
}
