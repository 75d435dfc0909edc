//! Dashboard metrics derived from the live store, not canned numbers.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;
use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime};
use utoipa::ToSchema;

use super::auth::require_admin;
use crate::api::state::AppState;
use crate::store::UserRecord;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub total_users: usize,
    /// Users not currently banned.
    pub active_users: usize,
    /// Users whose `createdAt` falls within the last 7 days.
    pub signups_this_week: usize,
    pub banned_users: usize,
}

#[utoipa::path(
    get,
    path = "/api/trust/admin/metrics",
    responses(
        (status = 200, description = "Store-derived dashboard metrics", body = MetricsResponse),
        (status = 401, description = "Missing or invalid credential", body = super::ErrorMessage),
        (status = 403, description = "Authenticated but not an admin", body = super::ErrorMessage),
    ),
    tag = "admin-metrics"
)]
pub async fn metrics(headers: HeaderMap, state: Extension<Arc<AppState>>) -> Response {
    let users = state.users.read().await;
    if let Err(err) = require_admin(&headers, &state.codec, &users) {
        return err.into_response();
    }

    let now = OffsetDateTime::now_utc();
    let total_users = users.len();
    let banned_users = users.list().iter().filter(|u| u.banned).count();
    let signups_this_week = users
        .list()
        .iter()
        .filter(|u| signed_up_since(u, now - Duration::days(7)))
        .count();

    (
        StatusCode::OK,
        Json(MetricsResponse {
            total_users,
            active_users: total_users - banned_users,
            signups_this_week,
            banned_users,
        }),
    )
        .into_response()
}

/// Unparsable or absent `createdAt` counts as not-this-week rather than
/// failing the whole metrics call.
fn signed_up_since(user: &UserRecord, cutoff: OffsetDateTime) -> bool {
    user.created_at
        .as_deref()
        .and_then(|stamp| OffsetDateTime::parse(stamp, &Rfc3339).ok())
        .is_some_and(|created| created >= cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Role;

    fn user_created_at(stamp: Option<&str>) -> UserRecord {
        UserRecord {
            id: "user_x".to_string(),
            email: "x@example.com".to_string(),
            display_name: "X".to_string(),
            role: Role::User,
            is_verified: false,
            banned: false,
            city: None,
            created_at: stamp.map(ToString::to_string),
        }
    }

    #[test]
    fn test_recent_signup_counts() {
        let now = OffsetDateTime::now_utc();
        let cutoff = now - Duration::days(7);
        let stamp = (now - Duration::days(2))
            .format(&Rfc3339)
            .expect("format");
        assert!(signed_up_since(&user_created_at(Some(&stamp)), cutoff));
    }

    #[test]
    fn test_old_signup_does_not_count() {
        let now = OffsetDateTime::now_utc();
        let cutoff = now - Duration::days(7);
        let stamp = (now - Duration::days(30))
            .format(&Rfc3339)
            .expect("format");
        assert!(!signed_up_since(&user_created_at(Some(&stamp)), cutoff));
    }

    #[test]
    fn test_missing_or_garbage_timestamp() {
        let cutoff = OffsetDateTime::now_utc() - Duration::days(7);
        assert!(!signed_up_since(&user_created_at(None), cutoff));
        assert!(!signed_up_since(&user_created_at(Some("yesterday")), cutoff));
    }
}
