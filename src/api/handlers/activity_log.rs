use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::auth::require_admin;
use crate::api::state::AppState;
use crate::store::AuditEntry;

#[utoipa::path(
    get,
    path = "/api/trust/admin/activity-log",
    responses(
        (status = 200, description = "Audit entries, most recent first", body = [AuditEntry]),
        (status = 401, description = "Missing or invalid credential", body = super::ErrorMessage),
        (status = 403, description = "Authenticated but not an admin", body = super::ErrorMessage),
    ),
    tag = "admin-audit"
)]
pub async fn activity_log(headers: HeaderMap, state: Extension<Arc<AppState>>) -> Response {
    {
        let users = state.users.read().await;
        if let Err(err) = require_admin(&headers, &state.codec, &users) {
            return err.into_response();
        }
    }

    let entries = state.audit.read().await.list();
    (StatusCode::OK, Json(entries)).into_response()
}
