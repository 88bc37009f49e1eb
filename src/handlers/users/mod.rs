//! User administration handlers: authenticate, authorize, parse, delegate,
//! report. The allow/deny decision and field filtering live in
//! [`crate::authz`] and [`crate::update`]; nothing here second-guesses them.

use axum::{
    body::Bytes,
    extract::{Extension, Path, State},
    http::{header::CONTENT_TYPE, HeaderMap},
};

use crate::authz::{self, ROLE_TENANT};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::middleware::session::SessionUser;
use crate::models::User;
use crate::update;
use crate::AppState;

/// GET /panel/api/users/list
pub async fn list(
    State(state): State<AppState>,
    Extension(SessionUser(caller)): Extension<SessionUser>,
) -> ApiResult<Vec<User>> {
    if authz::authorize_admin_only(caller.as_ref()).is_denied() {
        return Err(ApiError::PermissionDenied);
    }

    let users = state
        .users
        .fetch_all()
        .await
        .map_err(|e| ApiError::persistence("get", e))?;
    Ok(ApiResponse::success(users))
}

/// POST /panel/api/users/add
pub async fn add(
    State(state): State<AppState>,
    Extension(SessionUser(caller)): Extension<SessionUser>,
    body: Bytes,
) -> ApiResult<()> {
    if authz::authorize_admin_only(caller.as_ref()).is_denied() {
        return Err(ApiError::PermissionDenied);
    }

    let mut user: User =
        serde_json::from_slice(&body).map_err(|e| ApiError::validation("create", e))?;
    if user.role.is_empty() {
        user.role = ROLE_TENANT.to_string();
    }

    state
        .users
        .create(user)
        .await
        .map_err(|e| ApiError::persistence("create", e))?;
    Ok(ApiResponse::ack())
}

/// POST /panel/api/users/update/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(SessionUser(caller)): Extension<SessionUser>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<()> {
    let id: i64 = id.parse().map_err(|e| ApiError::validation("update", e))?;

    // Login-required is distinct from a permission denial here: the
    // self-match branch needs a caller id to compare against.
    let caller = caller.ok_or(ApiError::LoginRequired)?;
    if authz::authorize_self_or_admin(Some(&caller), id).is_denied() {
        return Err(ApiError::PermissionDenied);
    }

    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let updates = update::materialize(content_type, &body)
        .map_err(|e| ApiError::validation("update", e))?;

    state
        .users
        .update_by_id(id, &updates)
        .await
        .map_err(|e| ApiError::persistence("update", e))?;
    Ok(ApiResponse::ack())
}

/// POST /panel/api/users/del/:id
pub async fn del(
    State(state): State<AppState>,
    Extension(SessionUser(caller)): Extension<SessionUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    if authz::authorize_admin_only(caller.as_ref()).is_denied() {
        return Err(ApiError::PermissionDenied);
    }

    let id: i64 = id.parse().map_err(|e| ApiError::validation("delete", e))?;
    state
        .users
        .delete_by_id(id)
        .await
        .map_err(|e| ApiError::persistence("delete", e))?;
    Ok(ApiResponse::ack())
}
