//! Admin user-moderation endpoints.
//!
//! Flow Overview:
//! 1) Authorize the request through the admin access guard.
//! 2) Read or mutate the user record store.
//! 3) On mutation, append an audit entry attributed to the acting admin and
//!    persist the store when a data file is configured.

use axum::{
    body::Bytes,
    extract::{Extension, Path, Query},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

use super::auth::require_admin;
use super::error_message;
use crate::api::state::AppState;
use crate::store::{NewAuditEntry, UserPatch, UserRecord, UserStore};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Case-insensitive substring match over display name, email, and city.
    pub search: Option<String>,
    /// Page size; all matching records when unset.
    pub limit: Option<usize>,
    /// Records to skip before the page starts.
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserRecord>,
    /// Count of records matching the filter, before pagination.
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user: UserRecord,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BanRequest {
    /// `true` bans, `false` unbans. Defaults to `true` when omitted.
    pub ban: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/trust/admin/users",
    params(ListQuery),
    responses(
        (status = 200, description = "Filtered page of users plus the filtered total", body = UserListResponse),
        (status = 400, description = "Malformed session cookie", body = super::ErrorMessage),
        (status = 401, description = "Missing or invalid credential", body = super::ErrorMessage),
        (status = 403, description = "Authenticated but not an admin", body = super::ErrorMessage),
    ),
    tag = "admin-users"
)]
pub async fn list_users(
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
    state: Extension<Arc<AppState>>,
) -> Response {
    let users = state.users.read().await;
    if let Err(err) = require_admin(&headers, &state.codec, &users) {
        return err.into_response();
    }

    let filtered: Vec<&UserRecord> = users
        .list()
        .iter()
        .filter(|user| matches_search(user, query.search.as_deref()))
        .collect();
    let total = filtered.len();
    let page: Vec<UserRecord> = filtered
        .into_iter()
        .skip(query.offset.unwrap_or(0))
        .take(query.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();

    (StatusCode::OK, Json(UserListResponse { users: page, total })).into_response()
}

fn matches_search(user: &UserRecord, search: Option<&str>) -> bool {
    let Some(needle) = search.filter(|s| !s.is_empty()) else {
        return true;
    };
    let needle = needle.to_lowercase();
    user.display_name.to_lowercase().contains(&needle)
        || user.email.to_lowercase().contains(&needle)
        || user
            .city
            .as_deref()
            .is_some_and(|city| city.to_lowercase().contains(&needle))
}

#[utoipa::path(
    get,
    path = "/api/trust/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User detail", body = UserResponse),
        (status = 404, description = "Unknown user id", body = super::ErrorMessage),
    ),
    tag = "admin-users"
)]
pub async fn get_user(
    Path(id): Path<String>,
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
) -> Response {
    let users = state.users.read().await;
    if let Err(err) = require_admin(&headers, &state.codec, &users) {
        return err.into_response();
    }

    match users.find_by_id(&id) {
        Some(user) => (StatusCode::OK, Json(UserResponse { user: user.clone() })).into_response(),
        None => error_message(StatusCode::NOT_FOUND, "Not found"),
    }
}

#[utoipa::path(
    patch,
    path = "/api/trust/admin/users/{id}/verify",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User marked verified (idempotent)", body = UserResponse),
        (status = 404, description = "Unknown user id", body = super::ErrorMessage),
    ),
    tag = "admin-users"
)]
pub async fn verify_user(
    Path(id): Path<String>,
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
) -> Response {
    let mut users = state.users.write().await;
    let actor = match require_admin(&headers, &state.codec, &users) {
        Ok(actor) => actor,
        Err(err) => return err.into_response(),
    };

    let Some(updated) = users.update(&id, UserPatch::verified()).cloned() else {
        return error_message(StatusCode::NOT_FOUND, "User not found");
    };
    persist(&users);

    state.audit.write().await.append(
        NewAuditEntry::new(actor.clone(), "verify_user")
            .target(&id)
            .message(format!("User {id} verified by {actor}")),
    );

    (StatusCode::OK, Json(UserResponse { user: updated })).into_response()
}

#[utoipa::path(
    patch,
    path = "/api/trust/admin/users/{id}/ban",
    params(("id" = String, Path, description = "User id")),
    request_body = BanRequest,
    responses(
        (status = 200, description = "User banned or unbanned", body = UserResponse),
        (status = 400, description = "Malformed request body", body = super::ErrorMessage),
        (status = 404, description = "Unknown user id", body = super::ErrorMessage),
    ),
    tag = "admin-users"
)]
pub async fn ban_user(
    Path(id): Path<String>,
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    body: Bytes,
) -> Response {
    // An absent body defaults to banning; a present but unparsable one is
    // rejected before any store access.
    let ban = if body.is_empty() {
        true
    } else {
        match serde_json::from_slice::<BanRequest>(&body) {
            Ok(request) => request.ban.unwrap_or(true),
            Err(_) => return error_message(StatusCode::BAD_REQUEST, "Invalid request body"),
        }
    };

    let mut users = state.users.write().await;
    let actor = match require_admin(&headers, &state.codec, &users) {
        Ok(actor) => actor,
        Err(err) => return err.into_response(),
    };

    let Some(updated) = users.update(&id, UserPatch::banned(ban)).cloned() else {
        return error_message(StatusCode::NOT_FOUND, "User not found");
    };
    persist(&users);

    let (action, verb) = if ban {
        ("ban_user", "banned")
    } else {
        ("unban_user", "unbanned")
    };
    state.audit.write().await.append(
        NewAuditEntry::new(actor.clone(), action)
            .target(&id)
            .message(format!("User {id} {verb} by {actor}")),
    );

    (StatusCode::OK, Json(UserResponse { user: updated })).into_response()
}

/// Best-effort save after a mutation: the request still succeeds, but the
/// failure is logged rather than swallowed.
fn persist(users: &UserStore) {
    if let Err(err) = users.save() {
        warn!("failed to persist user store: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Role;

    fn user(name: &str, email: &str, city: Option<&str>) -> UserRecord {
        UserRecord {
            id: "user_x".to_string(),
            email: email.to_string(),
            display_name: name.to_string(),
            role: Role::User,
            is_verified: false,
            banned: false,
            city: city.map(ToString::to_string),
            created_at: None,
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let record = user("Bob Loblaw", "bob@example.com", Some("Brooklyn"));
        assert!(matches_search(&record, Some("BOB")));
        assert!(matches_search(&record, Some("brook")));
        assert!(matches_search(&record, Some("example.com")));
        assert!(!matches_search(&record, Some("chloe")));
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let record = user("Alice", "alice@example.com", None);
        assert!(matches_search(&record, None));
        assert!(matches_search(&record, Some("")));
    }

    #[test]
    fn test_search_handles_missing_city() {
        let record = user("Alice", "alice@example.com", None);
        assert!(!matches_search(&record, Some("brooklyn")));
    }
}
