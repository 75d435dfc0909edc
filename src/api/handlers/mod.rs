//! API handlers and shared helpers for the admin trust API.

pub mod activity_log;
pub mod auth;
pub mod dev;
pub mod health;
pub mod metrics;
pub mod trust_proxy;
pub mod users;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Uniform JSON error body: `{ "message": "..." }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorMessage {
    pub message: String,
}

pub(crate) fn error_message(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorMessage {
            message: message.to_string(),
        }),
    )
        .into_response()
}
