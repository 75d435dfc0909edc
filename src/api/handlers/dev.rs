//! Dev-only routes, disabled unless the server was started with
//! `--dev-routes`: mint an admin session cookie, and reset the store to
//! seed data.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::ToSchema;

use super::auth::{token_cookie, DEFAULT_TOKEN_TTL};
use super::error_message;
use crate::api::state::AppState;
use crate::store::{NewAuditEntry, Role};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DevSessionResponse {
    pub ok: bool,
    pub user_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeedResponse {
    /// Number of records after the reset.
    pub seeded: usize,
}

#[utoipa::path(
    post,
    path = "/api/dev/session",
    responses(
        (status = 200, description = "Signed admin token cookie issued for the seed admin", body = DevSessionResponse),
        (status = 404, description = "Dev routes disabled", body = super::ErrorMessage),
    ),
    tag = "dev"
)]
pub async fn session(state: Extension<Arc<AppState>>) -> Response {
    if !state.config.dev_routes {
        return error_message(StatusCode::NOT_FOUND, "Not available");
    }

    let users = state.users.read().await;
    let Some(admin) = users.list().iter().find(|u| u.role == Role::Admin) else {
        return error_message(StatusCode::NOT_FOUND, "No admin user in store");
    };
    let user_id = admin.id.clone();
    drop(users);

    let token = match state.codec.sign(&user_id, true, DEFAULT_TOKEN_TTL) {
        Ok(token) => token,
        Err(err) => {
            error!("failed to sign dev session token: {err}");
            return error_message(StatusCode::INTERNAL_SERVER_ERROR, "Token signing failed");
        }
    };

    let mut headers = HeaderMap::new();
    match token_cookie(&token, DEFAULT_TOKEN_TTL.whole_seconds()) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("failed to build dev session cookie: {err}");
            return error_message(StatusCode::INTERNAL_SERVER_ERROR, "Cookie build failed");
        }
    }

    (
        StatusCode::OK,
        headers,
        Json(DevSessionResponse { ok: true, user_id }),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/dev/seed",
    responses(
        (status = 200, description = "Store reset to the seed list", body = SeedResponse),
        (status = 404, description = "Dev routes disabled", body = super::ErrorMessage),
    ),
    tag = "dev"
)]
pub async fn seed(state: Extension<Arc<AppState>>) -> Response {
    if !state.config.dev_routes {
        return error_message(StatusCode::NOT_FOUND, "Not available");
    }

    let mut users = state.users.write().await;
    let seeded = users.reset_to_seed();
    if let Err(err) = users.save() {
        warn!("failed to persist reseeded store: {err}");
    }

    state.audit.write().await.append(
        NewAuditEntry::new("system", "seed_db").message("Seeded users from the fixed seed list"),
    );

    (StatusCode::OK, Json(SeedResponse { seeded })).into_response()
}
